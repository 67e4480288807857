//! UseCase: identify
//!
//! ピアが自分のロール・ホスト名・ルームを名乗る処理。レジストリを更新し、
//! 名乗ったルームにプレゼンスを配信します。ルームが変わった場合は
//! 前のルームの残りのメンバーにも配信します（room:join と同じ）。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionPatch, ConnectionRepository, Role, RoomId};

use super::PresencePublisher;

/// identify のユースケース
pub struct IdentifyUseCase {
    repository: Arc<dyn ConnectionRepository>,
    publisher: Arc<PresencePublisher>,
}

impl IdentifyUseCase {
    pub fn new(repository: Arc<dyn ConnectionRepository>, publisher: Arc<PresencePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// identify を実行
    ///
    /// # Returns
    ///
    /// 更新後のエントリ。切断済みのコネクションなら `None`（no-op）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        role: Role,
        hostname: Option<String>,
        room_id: RoomId,
    ) -> Option<Connection> {
        let previous_room = self
            .repository
            .get(connection_id)
            .await
            .map(|conn| conn.room_id);

        let patch = ConnectionPatch::identify(role, hostname, room_id);
        let Some(updated) = self.repository.update(connection_id, patch).await else {
            tracing::debug!("Ignoring identify from unknown connection '{}'", connection_id);
            return None;
        };

        tracing::info!(
            "Connection '{}' identified as '{}' in room '{}'",
            connection_id,
            updated.role.as_str(),
            updated.room_id
        );
        self.publisher.publish(&updated.room_id).await;

        if let Some(previous_room) = previous_room.filter(|room| room != &updated.room_id) {
            self.publisher.publish(&previous_room).await;
        }

        Some(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::test_support::{Harness, drain, id, presence_ids};

    fn usecase(harness: &Harness) -> IdentifyUseCase {
        IdentifyUseCase::new(harness.repository.clone(), harness.publisher.clone())
    }

    #[tokio::test]
    async fn test_identify_updates_entry() {
        // テスト項目: identify でロール・ホスト名・ルームが記録される
        // given (前提条件):
        let harness = Harness::new();
        let _rx = harness.connect("alice").await;

        // when (操作):
        let updated = usecase(&harness)
            .execute(
                &id("alice"),
                Role::from_optional(Some("host".to_string())),
                Some("h1".to_string()),
                RoomId::new("r1"),
            )
            .await;

        // then (期待する結果):
        let updated = updated.expect("entry should exist");
        assert_eq!(updated.role.as_str(), "host");
        assert_eq!(updated.hostname.as_deref(), Some("h1"));
        let r1 = harness.repository.snapshot_by_room(&RoomId::new("r1")).await;
        assert_eq!(r1.len(), 1);
    }

    #[tokio::test]
    async fn test_second_identify_publishes_both_members() {
        // テスト項目: B が先に r1 に入った後 A が identify すると、B は A と B を含む更新を受け取る
        // given (前提条件):
        let harness = Harness::new();
        let uc = usecase(&harness);
        let mut rx_a = harness.connect("a").await;
        let mut rx_b = harness.connect("b").await;
        uc.execute(&id("b"), Role::unknown(), None, RoomId::new("r1"))
            .await;
        drain(&mut rx_a);
        drain(&mut rx_b);

        // when (操作):
        uc.execute(&id("a"), Role::unknown(), None, RoomId::new("r1"))
            .await;

        // then (期待する結果):
        let b_events = drain(&mut rx_b);
        assert_eq!(b_events.len(), 1);
        assert_eq!(presence_ids(&b_events[0]), vec!["a", "b"]);
        let a_events = drain(&mut rx_a);
        assert_eq!(a_events.len(), 1);
    }

    #[tokio::test]
    async fn test_identify_unknown_connection_is_noop() {
        // テスト項目: 切断済み（未登録）のコネクションの identify は何もしない
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_bob = harness.connect("bob").await;

        // when (操作):
        let result = usecase(&harness)
            .execute(&id("ghost"), Role::unknown(), None, RoomId::default())
            .await;

        // then (期待する結果):
        assert!(result.is_none());
        assert!(harness.repository.get(&id("ghost")).await.is_none());
        assert!(drain(&mut rx_bob).is_empty());
    }

    #[tokio::test]
    async fn test_identify_into_new_room_republishes_previous_room() {
        // テスト項目: "default" から別のルームを名乗ると、"default" に残ったメンバーにも更新が届く
        // given (前提条件):
        let harness = Harness::new();
        let mut rx_alice = harness.connect("alice").await;
        let mut rx_bob = harness.connect("bob").await;

        // when (操作):
        usecase(&harness)
            .execute(&id("alice"), Role::unknown(), None, RoomId::new("r1"))
            .await;

        // then (期待する結果):
        let alice_events = drain(&mut rx_alice);
        assert_eq!(alice_events.len(), 1);
        assert_eq!(presence_ids(&alice_events[0]), vec!["alice"]);
        let bob_events = drain(&mut rx_bob);
        assert_eq!(bob_events.len(), 1);
        assert_eq!(presence_ids(&bob_events[0]), vec!["bob"]);
    }
}
