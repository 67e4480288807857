//! UseCase: 使用中のルーム一覧取得

use std::{collections::BTreeMap, sync::Arc};

use crate::domain::{ConnectionId, ConnectionRepository, RoomId, room_index};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn ConnectionRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>) -> Self {
        Self { repository }
    }

    /// メンバーが 1 人以上いるルームと、そのメンバーの ID を返す
    pub async fn execute(&self) -> BTreeMap<RoomId, Vec<ConnectionId>> {
        let connections = self.repository.all_snapshot().await;
        room_index::occupied_rooms(&connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionPatch,
        usecase::test_support::{Harness, id},
    };

    #[tokio::test]
    async fn test_rooms_without_connections_is_empty() {
        // テスト項目: 接続がなければルーム一覧は空
        // given (前提条件):
        let harness = Harness::new();
        let usecase = GetRoomsUseCase::new(harness.repository.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_rooms_lists_occupied_rooms() {
        // テスト項目: 使用中のルームだけがメンバー付きで返される
        // given (前提条件):
        let harness = Harness::new();
        let _rx_a = harness.connect("a").await;
        let _rx_b = harness.connect("b").await;
        harness
            .repository
            .update(&id("b"), ConnectionPatch::join_room(RoomId::new("r1")))
            .await;
        let usecase = GetRoomsUseCase::new(harness.repository.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[&RoomId::default()], vec![id("a")]);
        assert_eq!(rooms[&RoomId::new("r1")], vec![id("b")]);
    }
}
