//! Events the server delivers to connections.

use serde_json::Value;

use super::{
    entity::Connection,
    value_object::{ConnectionId, RoomId, Timestamp},
};

/// WebRTC negotiation message kinds relayed between peers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

/// Outbound event, independent of its wire encoding.
///
/// Opaque peer payloads (`sdp`, `candidate`, chat `message`, ping timestamp)
/// are carried as raw JSON values and never inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// Tells a freshly connected peer the id others address it by
    ConnectionReady { connection_id: ConnectionId },
    /// Presence snapshot of one room
    PresenceUpdate(Vec<Connection>),
    /// Echo of a `heartbeat:ping`
    HeartbeatPong(Value),
    /// Relayed offer, answer or ICE candidate
    Signal {
        kind: SignalKind,
        from: ConnectionId,
        body: Value,
        room_id: RoomId,
    },
    /// Relayed private chat message stamped with the server time
    PrivateChat {
        from: ConnectionId,
        message: Value,
        ts: Timestamp,
    },
}

impl ServerEvent {
    /// Event name used on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConnectionReady { .. } => "connection:ready",
            Self::PresenceUpdate(_) => "presence:update",
            Self::HeartbeatPong(_) => "heartbeat:pong",
            Self::Signal { kind, .. } => kind.event_name(),
            Self::PrivateChat { .. } => "chat:private",
        }
    }
}

impl SignalKind {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Offer => "webrtc:offer",
            Self::Answer => "webrtc:answer",
            Self::IceCandidate => "webrtc:ice-candidate",
        }
    }
}
