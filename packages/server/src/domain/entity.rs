//! Connection entity and its partial-update patch.

use super::value_object::{ConnectionId, Role, RoomId, Timestamp};

/// Presence metadata for one live transport session.
///
/// Exactly one `Connection` exists per live session. It is created with
/// defaults at connect time and removed once at disconnect.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub role: Role,
    pub hostname: Option<String>,
    pub room_id: RoomId,
    /// Time of the most recent latency report (connect time until the first one)
    pub last_heartbeat_at: Timestamp,
    /// Last self-reported round-trip time
    pub latency_ms: Option<f64>,
}

impl Connection {
    /// Create a connection entry with default metadata.
    pub fn new(id: ConnectionId, connected_at: Timestamp) -> Self {
        Self {
            id,
            role: Role::unknown(),
            hostname: None,
            room_id: RoomId::default(),
            last_heartbeat_at: connected_at,
            latency_ms: None,
        }
    }

    /// Merge every field present in `patch` into this entry.
    pub fn apply(&mut self, patch: ConnectionPatch) {
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(hostname) = patch.hostname {
            self.hostname = hostname;
        }
        if let Some(room_id) = patch.room_id {
            self.room_id = room_id;
        }
        if let Some(at) = patch.last_heartbeat_at {
            self.last_heartbeat_at = at;
        }
        if let Some(latency) = patch.latency_ms {
            self.latency_ms = Some(latency);
        }
    }
}

/// Whole-field replacements to merge into a [`Connection`].
///
/// `None` leaves the field untouched. `hostname` is doubly optional because an
/// identify without a hostname clears the previous value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionPatch {
    pub role: Option<Role>,
    pub hostname: Option<Option<String>>,
    pub room_id: Option<RoomId>,
    pub last_heartbeat_at: Option<Timestamp>,
    pub latency_ms: Option<f64>,
}

impl ConnectionPatch {
    /// Patch applied by `identify`
    pub fn identify(role: Role, hostname: Option<String>, room_id: RoomId) -> Self {
        Self {
            role: Some(role),
            hostname: Some(hostname),
            room_id: Some(room_id),
            ..Self::default()
        }
    }

    /// Patch applied by `room:join`
    pub fn join_room(room_id: RoomId) -> Self {
        Self {
            room_id: Some(room_id),
            ..Self::default()
        }
    }

    /// Patch applied by `heartbeat:latency`
    pub fn heartbeat(at: Timestamp, latency_ms: f64) -> Self {
        Self {
            last_heartbeat_at: Some(at),
            latency_ms: Some(latency_ms),
            ..Self::default()
        }
    }
}
