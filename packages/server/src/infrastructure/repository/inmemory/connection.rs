//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリのレジストリとして使用します。
//!
//! 1 つの Mutex が ID → Connection のマップ全体を保護します。更新はフィールド単位の
//! 置き換えなので、エントリごとのロックは不要です。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    Connection, ConnectionId, ConnectionPatch, ConnectionRepository, RoomId, Timestamp,
    room_index,
};

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    /// Key: ConnectionId, Value: Connection
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn register(&self, connection_id: ConnectionId, connected_at: Timestamp) -> Connection {
        let connection = Connection::new(connection_id.clone(), connected_at);
        let mut connections = self.connections.lock().await;
        if connections
            .insert(connection_id, connection.clone())
            .is_some()
        {
            tracing::warn!(
                "Connection '{}' was already registered, replacing entry",
                connection.id
            );
        }
        connection
    }

    async fn update(
        &self,
        connection_id: &ConnectionId,
        patch: ConnectionPatch,
    ) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        let entry = connections.get_mut(connection_id)?;
        entry.apply(patch);
        Some(entry.clone())
    }

    async fn remove(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let mut connections = self.connections.lock().await;
        connections.remove(connection_id)
    }

    async fn get(&self, connection_id: &ConnectionId) -> Option<Connection> {
        let connections = self.connections.lock().await;
        connections.get(connection_id).cloned()
    }

    async fn snapshot_by_room(&self, room_id: &RoomId) -> Vec<Connection> {
        let connections = self.connections.lock().await;
        room_index::room_members(connections.values(), room_id)
    }

    async fn all_snapshot(&self) -> Vec<Connection> {
        let connections = self.connections.lock().await;
        room_index::all_members(connections.values())
    }

    async fn count(&self) -> usize {
        let connections = self.connections.lock().await;
        connections.len()
    }
}
