//! UseCase: heartbeat
//!
//! - `heartbeat:ping`: 送信者本人にだけ値をそのまま `heartbeat:pong` で返す。
//!   レジストリには触れない。
//! - `heartbeat:latency`: 自己申告のレイテンシと受信時刻を記録し、
//!   所属ルームにプレゼンスを配信する。
//!
//! サーバー側ではハートビートのタイムアウトを監視しない（古い接続の検出は
//! クライアント側の責務）。

use std::sync::Arc;

use serde_json::Value;
use tsunagi_shared::time::Clock;

use crate::domain::{
    Connection, ConnectionId, ConnectionPatch, ConnectionRepository, MessagePushError,
    MessagePusher, ServerEvent, Timestamp,
};

use super::PresencePublisher;

/// heartbeat のユースケース
pub struct HeartbeatUseCase {
    repository: Arc<dyn ConnectionRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    publisher: Arc<PresencePublisher>,
    clock: Arc<dyn Clock>,
}

impl HeartbeatUseCase {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        publisher: Arc<PresencePublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            publisher,
            clock,
        }
    }

    /// ping の値をそのまま送信者に返す
    pub async fn ping(
        &self,
        connection_id: &ConnectionId,
        client_timestamp: Value,
    ) -> Result<(), MessagePushError> {
        self.message_pusher
            .push_to(connection_id, &ServerEvent::HeartbeatPong(client_timestamp))
            .await
    }

    /// 自己申告のレイテンシを記録してプレゼンスを配信する
    ///
    /// # Returns
    ///
    /// 更新後のエントリ。切断済みのコネクションなら `None`（no-op）
    pub async fn report_latency(
        &self,
        connection_id: &ConnectionId,
        latency_ms: f64,
    ) -> Option<Connection> {
        let now = Timestamp::new(self.clock.now_millis());
        let Some(updated) = self
            .repository
            .update(connection_id, ConnectionPatch::heartbeat(now, latency_ms))
            .await
        else {
            tracing::debug!("Ignoring latency report from unknown connection '{}'", connection_id);
            return None;
        };

        self.publisher.publish(&updated.room_id).await;
        Some(updated)
    }
}
