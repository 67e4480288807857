//! Room membership derived from connection state.
//!
//! A room is not stored anywhere. It is the set of connections whose `room_id`
//! equals a given value, so every broadcast target list is computed here by
//! filtering registry entries.

use std::collections::BTreeMap;

use super::{
    entity::Connection,
    value_object::{ConnectionId, RoomId},
};

/// Collect the connections that belong to `room_id`, sorted by connection id.
pub fn room_members<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
    room_id: &RoomId,
) -> Vec<Connection> {
    let mut members: Vec<Connection> = connections
        .into_iter()
        .filter(|conn| &conn.room_id == room_id)
        .cloned()
        .collect();
    members.sort_by(|a, b| a.id.cmp(&b.id));
    members
}

/// Collect every connection, sorted by connection id.
pub fn all_members<'a>(connections: impl IntoIterator<Item = &'a Connection>) -> Vec<Connection> {
    let mut members: Vec<Connection> = connections.into_iter().cloned().collect();
    members.sort_by(|a, b| a.id.cmp(&b.id));
    members
}

/// Broadcast targets for a room snapshot.
pub fn member_ids(members: &[Connection]) -> Vec<ConnectionId> {
    members.iter().map(|conn| conn.id.clone()).collect()
}

/// Group occupied rooms with their member ids, ordered by room id.
pub fn occupied_rooms<'a>(
    connections: impl IntoIterator<Item = &'a Connection>,
) -> BTreeMap<RoomId, Vec<ConnectionId>> {
    let mut rooms: BTreeMap<RoomId, Vec<ConnectionId>> = BTreeMap::new();
    for conn in connections {
        rooms
            .entry(conn.room_id.clone())
            .or_default()
            .push(conn.id.clone());
    }
    for members in rooms.values_mut() {
        members.sort();
    }
    rooms
}
