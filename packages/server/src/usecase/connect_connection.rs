//! UseCase: コネクション接続処理
//!
//! 接続時にデフォルト値でレジストリへ登録し、送信キューを登録します。
//! ルームはまだ意味を持たないため、プレゼンスは配信しません。

use std::sync::Arc;

use tsunagi_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionRepository, MessagePusher, PusherChannel, ServerEvent,
    Timestamp,
};

/// コネクション接続のユースケース
pub struct ConnectConnectionUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectConnectionUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// コネクション接続を実行
    ///
    /// 1. Repository にデフォルト値のエントリを登録
    /// 2. MessagePusher に送信キューを登録
    /// 3. 本人に `connection:ready` を送信（自分の ID を知らせる）
    pub async fn execute(&self, connection_id: ConnectionId, sender: PusherChannel) -> Connection {
        let connected_at = Timestamp::new(self.clock.now_millis());
        let connection = self
            .repository
            .register(connection_id.clone(), connected_at)
            .await;

        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;

        let ready = ServerEvent::ConnectionReady {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &ready).await {
            tracing::warn!("Failed to send connection:ready to '{}': {}", connection_id, e);
        }

        connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::ServerEventDto,
        usecase::test_support::{Harness, drain, id},
    };
    use tsunagi_shared::time::FixedClock;

    #[tokio::test]
    async fn test_connect_registers_defaults() {
        // テスト項目: 接続直後のエントリは role="unknown", roomId="default"
        // given (前提条件):
        let harness = Harness::new();
        let usecase = ConnectConnectionUseCase::new(
            harness.repository.clone(),
            harness.message_pusher.clone(),
            Arc::new(FixedClock::new(5000)),
        );
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(id("alice"), tx).await;

        // then (期待する結果):
        let entry = harness.repository.get(&id("alice")).await.unwrap();
        assert_eq!(entry.role.as_str(), "unknown");
        assert_eq!(entry.room_id.as_str(), "default");
        assert_eq!(entry.last_heartbeat_at, Timestamp::new(5000));
    }

    #[tokio::test]
    async fn test_connect_sends_ready_without_presence() {
        // テスト項目: 本人に connection:ready だけが送られ、プレゼンスは配信されない
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_bob = harness.connect("bob").await;
        let usecase = ConnectConnectionUseCase::new(
            harness.repository.clone(),
            harness.message_pusher.clone(),
            Arc::new(FixedClock::new(5000)),
        );
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(id("alice"), tx).await;

        // then (期待する結果):
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ServerEventDto::ConnectionReady(ready) if ready.connection_id == "alice"
        ));
        assert!(drain(&mut rx_bob).is_empty());
    }
}
