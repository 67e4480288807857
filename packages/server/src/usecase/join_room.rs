//! UseCase: room:join
//!
//! ルーム所属はコネクションの `room_id` フィールドだけで表現されるため、
//! 新しいルームへの移動は同時に前のルームからの退出を意味します。
//! 前のルームの残りのメンバーにも最新のスナップショットを配信します。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionPatch, ConnectionRepository, RoomId};

use super::PresencePublisher;

/// room:join のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn ConnectionRepository>,
    publisher: Arc<PresencePublisher>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, publisher: Arc<PresencePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// room:join を実行
    ///
    /// # Returns
    ///
    /// 更新後のエントリ。切断済みのコネクションなら `None`（no-op）
    pub async fn execute(&self, connection_id: &ConnectionId, room_id: RoomId) -> Option<Connection> {
        let previous_room = self
            .repository
            .get(connection_id)
            .await
            .map(|conn| conn.room_id);

        let Some(updated) = self
            .repository
            .update(connection_id, ConnectionPatch::join_room(room_id))
            .await
        else {
            tracing::debug!("Ignoring room:join from unknown connection '{}'", connection_id);
            return None;
        };

        tracing::info!("Connection '{}' joined room '{}'", connection_id, updated.room_id);
        self.publisher.publish(&updated.room_id).await;

        if let Some(previous_room) = previous_room.filter(|room| room != &updated.room_id) {
            self.publisher.publish(&previous_room).await;
        }

        Some(updated)
    }
}
