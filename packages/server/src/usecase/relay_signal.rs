//! UseCase: シグナリング中継
//!
//! WebRTC のネゴシエーション（offer / answer / ICE candidate）と
//! プライベートチャットを、指定されたコネクションにだけ転送します。
//! レジストリを参照・更新せず、プレゼンスも配信しません。

use std::sync::Arc;

use serde_json::Value;
use tsunagi_shared::time::Clock;

use crate::domain::{ConnectionId, MessagePusher, RoomId, ServerEvent, SignalKind, Timestamp};

use super::error::RelayError;

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RelaySignalUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>, clock: Arc<dyn Clock>) -> Self {
        Self {
            message_pusher,
            clock,
        }
    }

    /// offer / answer / ICE candidate を中継する
    pub async fn relay_signal(
        &self,
        kind: SignalKind,
        from: ConnectionId,
        to: &ConnectionId,
        body: Value,
        room_id: RoomId,
    ) -> Result<(), RelayError> {
        let event = ServerEvent::Signal {
            kind,
            from,
            body,
            room_id,
        };
        self.deliver(to, &event).await
    }

    /// プライベートチャットをサーバー時刻付きで中継する
    pub async fn relay_private_chat(
        &self,
        from: ConnectionId,
        to: &ConnectionId,
        message: Value,
    ) -> Result<(), RelayError> {
        let event = ServerEvent::PrivateChat {
            from,
            message,
            ts: Timestamp::new(self.clock.now_millis()),
        };
        self.deliver(to, &event).await
    }

    async fn deliver(&self, to: &ConnectionId, event: &ServerEvent) -> Result<(), RelayError> {
        self.message_pusher
            .push_to(to, event)
            .await
            .map_err(|e| RelayError::from_push(to.as_str(), e))
    }
}
