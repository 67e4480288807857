//! Value objects for the signaling domain.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Maximum length of a connection identifier
pub const CONNECTION_ID_MAX_LEN: usize = 128;

/// Room every connection belongs to until it says otherwise
pub const DEFAULT_ROOM_ID: &str = "default";

/// Role recorded until the peer identifies itself
pub const UNKNOWN_ROLE: &str = "unknown";

/// Opaque identifier of one live transport session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a ConnectionId, rejecting empty or oversized values.
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        let len = value.chars().count();
        if len > CONNECTION_ID_MAX_LEN {
            return Err(ValueObjectError::ConnectionIdTooLong(len));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues fresh connection identifiers at upgrade time.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId backed by a UUID v4
    pub fn generate() -> ConnectionId {
        ConnectionId(Uuid::new_v4().to_string())
    }
}

/// Label grouping connections for presence and broadcast.
///
/// Absent or empty labels collapse to [`DEFAULT_ROOM_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::default()
        } else {
            Self(value)
        }
    }

    pub fn from_optional(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for RoomId {
    fn default() -> Self {
        Self(DEFAULT_ROOM_ID.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-form role a peer announces (e.g. "host", "client").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role(String);

impl Role {
    pub fn unknown() -> Self {
        Self(UNKNOWN_ROLE.to_string())
    }

    /// Absent or empty roles are recorded as "unknown".
    pub fn from_optional(value: Option<String>) -> Self {
        match value {
            Some(role) if !role.is_empty() => Self(role),
            _ => Self::unknown(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Unix timestamp in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}
