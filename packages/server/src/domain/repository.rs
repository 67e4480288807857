//! Repository trait 定義
//!
//! コネクションレジストリへのインターフェースを定義します。
//! レジストリはプレゼンス情報の唯一の所有者です。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    entity::{Connection, ConnectionPatch},
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// Connection Repository trait
///
/// 存在しない ID に対する更新・削除はエラーではなく no-op として扱う
/// （切断と競合する遅延イベントを許容するため）。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// デフォルト値でコネクションを登録（同じ ID の場合は上書き）
    async fn register(&self, connection_id: ConnectionId, connected_at: Timestamp) -> Connection;

    /// パッチをマージし、更新後のエントリを返す（存在しなければ None）
    async fn update(
        &self,
        connection_id: &ConnectionId,
        patch: ConnectionPatch,
    ) -> Option<Connection>;

    /// コネクションを削除し、削除したエントリを返す（存在しなければ None）
    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// コネクションを取得
    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection>;

    /// 指定ルームのプレゼンススナップショットを取得
    async fn snapshot_by_room(&self, room_id: &RoomId) -> Vec<Connection>;

    /// 全ルームのプレゼンススナップショットを取得
    async fn all_snapshot(&self) -> Vec<Connection>;

    /// 接続中のコネクション数を取得
    async fn count(&self) -> usize;
}
