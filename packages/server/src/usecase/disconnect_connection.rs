//! UseCase: コネクション切断処理
//!
//! トランスポートが閉じたときに一度だけ呼ばれます。レジストリから削除し、
//! 削除前に所属していたルームの残りのメンバーにプレゼンスを配信します。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, MessagePusher};

use super::PresencePublisher;

/// コネクション切断のユースケース
pub struct DisconnectConnectionUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    publisher: Arc<PresencePublisher>,
}

impl DisconnectConnectionUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        publisher: Arc<PresencePublisher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            publisher,
        }
    }

    /// コネクション切断を実行
    ///
    /// # Returns
    ///
    /// 削除したエントリ。既に削除済みなら `None`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Connection> {
        // 1. Repository から削除（削除前のエントリを受け取る）
        let removed = self.repository.remove(connection_id).await;

        // 2. MessagePusher から送信キューを登録解除
        self.message_pusher.unregister_client(connection_id).await;

        // 3. 削除前のルームに配信
        let removed = removed?;
        self.publisher.publish(&removed.room_id).await;

        Some(removed)
    }

    /// 残りのコネクション数を取得
    pub async fn count_remaining_connections(&self) -> usize {
        self.repository.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionPatch, RoomId},
        usecase::test_support::{Harness, drain, id, presence_ids},
    };

    fn usecase(harness: &Harness) -> DisconnectConnectionUseCase {
        DisconnectConnectionUseCase::new(
            harness.repository.clone(),
            harness.message_pusher.clone(),
            harness.publisher.clone(),
        )
    }

    #[tokio::test]
    async fn test_disconnect_notifies_former_room_once() {
        // テスト項目: 切断で残りのメンバーに一度だけ更新が届き、本人は以後のスナップショットから消える
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        let mut rx_c = harness.connect("c").await;
        for name in ["a", "b"] {
            harness
                .repository
                .update(&id(name), ConnectionPatch::join_room(RoomId::new("r1")))
                .await;
        }

        // when (操作):
        let removed = usecase(&harness).execute(&id("a")).await;

        // then (期待する結果):
        assert_eq!(removed.unwrap().room_id.as_str(), "r1");
        let b_events = drain(&mut rx_b);
        assert_eq!(b_events.len(), 1);
        assert_eq!(presence_ids(&b_events[0]), vec!["b"]);
        assert!(drain(&mut rx_c).is_empty());
        assert!(harness.repository.get(&id("a")).await.is_none());
        let r1 = harness.repository.snapshot_by_room(&RoomId::new("r1")).await;
        assert!(r1.iter().all(|conn| conn.id.as_str() != "a"));
    }

    #[tokio::test]
    async fn test_disconnect_twice_is_noop() {
        // テスト項目: 二度目の切断は何もせず、配信もしない
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        let uc = usecase(&harness);
        uc.execute(&id("a")).await;
        drain(&mut rx_b);

        // when (操作):
        let second = uc.execute(&id("a")).await;

        // then (期待する結果):
        assert!(second.is_none());
        assert!(drain(&mut rx_b).is_empty());
        assert_eq!(uc.count_remaining_connections().await, 1);
    }
}
