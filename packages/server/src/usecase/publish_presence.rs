//! Presence Publisher
//!
//! ルームのスナップショットを再計算し、そのルームの全メンバーに
//! `presence:update` として配送します。スナップショットはキャッシュしません。
//!
//! スナップショットの取得からキューへの追加までを一つのロックで直列化するため、
//! どのメンバーも最後に受け取る更新が常に最新のレジストリを反映します。

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{ConnectionRepository, MessagePusher, RoomId, ServerEvent, room_index};

/// ルーム単位のプレゼンス配信
pub struct PresencePublisher {
    /// Repository（コネクションレジストリの抽象化）
    repository: Arc<dyn ConnectionRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// スナップショット取得と配送を直列化するロック
    publish_lock: Mutex<()>,
}

impl PresencePublisher {
    /// 新しい PresencePublisher を作成
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            publish_lock: Mutex::new(()),
        }
    }

    /// ルームのスナップショットをメンバー全員に配送する
    ///
    /// # Returns
    ///
    /// 配送対象のコネクション数（空のルームなら 0 で、何も送らない）
    pub async fn publish(&self, room_id: &RoomId) -> usize {
        // 送信キューは unbounded なので、ロック中にピアの受信を待つことはない
        let _guard = self.publish_lock.lock().await;

        let snapshot = self.repository.snapshot_by_room(room_id).await;
        if snapshot.is_empty() {
            tracing::debug!("Room '{}' is empty, skipping presence update", room_id);
            return 0;
        }

        let targets = room_index::member_ids(&snapshot);
        let recipients = targets.len();
        let event = ServerEvent::PresenceUpdate(snapshot);

        if let Err(e) = self.message_pusher.broadcast(targets, &event).await {
            tracing::warn!("Failed to publish presence for room '{}': {}", room_id, e);
        } else {
            tracing::debug!(
                "Published presence for room '{}' to {} connection(s)",
                room_id,
                recipients
            );
        }

        recipients
    }
}
