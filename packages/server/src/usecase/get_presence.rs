//! UseCase: プレゼンス取得（REST の読み取り用）

use std::sync::Arc;

use crate::domain::{Connection, ConnectionRepository, RoomId};

/// プレゼンス取得のユースケース
pub struct GetPresenceUseCase {
    repository: Arc<dyn ConnectionRepository>,
}

impl GetPresenceUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// ルームを指定すればそのルームの、指定しなければ全ルームのスナップショットを返す
    pub async fn execute(&self, room_id: Option<RoomId>) -> Vec<Connection> {
        match room_id {
            Some(room_id) => self.repository.snapshot_by_room(&room_id).await,
            None => self.repository.all_snapshot().await,
        }
    }
}
