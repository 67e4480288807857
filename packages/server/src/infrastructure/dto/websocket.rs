//! WebSocket event frames.
//!
//! Every frame is a JSON text message `{"type": "<event>", "payload": <value>}`.
//! `payload` may be omitted, in which case it is treated as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while decoding an inbound frame
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Frame is not a JSON envelope with a `type` field
    #[error("Invalid frame: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Event name is not part of the protocol
    #[error("Unknown event '{0}'")]
    UnknownEvent(String),

    /// Payload does not match the event's shape
    #[error("Invalid payload for '{event}': {source}")]
    InvalidPayload {
        event: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event: String,
    #[serde(default)]
    payload: Value,
}

/// Payload of `identify`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPayload {
    pub role: Option<String>,
    pub hostname: Option<String>,
    pub room_id: Option<String>,
}

/// Payload of `webrtc:offer` and `webrtc:answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptionPayload {
    pub to_connection_id: String,
    pub sdp: Value,
    pub room_id: Option<String>,
}

/// Payload of `webrtc:ice-candidate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidatePayload {
    pub to_connection_id: String,
    pub candidate: Value,
    pub room_id: Option<String>,
}

/// Payload of `chat:private`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPrivatePayload {
    pub to_connection_id: String,
    pub message: Value,
}

/// Decoded inbound event
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Identify(IdentifyPayload),
    JoinRoom(Option<String>),
    HeartbeatPing(Value),
    HeartbeatLatency(f64),
    WebRtcOffer(SessionDescriptionPayload),
    WebRtcAnswer(SessionDescriptionPayload),
    IceCandidate(IceCandidatePayload),
    ChatPrivate(ChatPrivatePayload),
}

impl ClientEvent {
    /// Decode a text frame into a [`ClientEvent`].
    pub fn decode(text: &str) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(text).map_err(DecodeError::InvalidJson)?;
        let Envelope { event, payload } = envelope;

        let decoded = match event.as_str() {
            "identify" => payload_as(object_or_empty(payload)).map(Self::Identify),
            "room:join" => payload_as(payload).map(Self::JoinRoom),
            "heartbeat:ping" => Ok(Self::HeartbeatPing(payload)),
            "heartbeat:latency" => payload_as(payload).map(Self::HeartbeatLatency),
            "webrtc:offer" => payload_as(object_or_empty(payload)).map(Self::WebRtcOffer),
            "webrtc:answer" => payload_as(object_or_empty(payload)).map(Self::WebRtcAnswer),
            "webrtc:ice-candidate" => {
                payload_as(object_or_empty(payload)).map(Self::IceCandidate)
            }
            "chat:private" => payload_as(object_or_empty(payload)).map(Self::ChatPrivate),
            _ => return Err(DecodeError::UnknownEvent(event)),
        };

        decoded.map_err(|source| DecodeError::InvalidPayload { event, source })
    }

    /// Event name as sent on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identify(_) => "identify",
            Self::JoinRoom(_) => "room:join",
            Self::HeartbeatPing(_) => "heartbeat:ping",
            Self::HeartbeatLatency(_) => "heartbeat:latency",
            Self::WebRtcOffer(_) => "webrtc:offer",
            Self::WebRtcAnswer(_) => "webrtc:answer",
            Self::IceCandidate(_) => "webrtc:ice-candidate",
            Self::ChatPrivate(_) => "chat:private",
        }
    }
}

fn payload_as<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(payload)
}

// An omitted payload means "all defaults" for object-shaped events.
fn object_or_empty(payload: Value) -> Value {
    match payload {
        Value::Null => Value::Object(Map::new()),
        other => other,
    }
}

/// One entry of a presence snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntryDto {
    pub id: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub last_heartbeat_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    pub room_id: String,
}

/// Payload of `connection:ready`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReadyDto {
    pub connection_id: String,
}

/// Relayed `webrtc:offer` / `webrtc:answer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescriptionRelayDto {
    pub from_connection_id: String,
    pub sdp: Value,
    pub room_id: String,
}

/// Relayed `webrtc:ice-candidate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateRelayDto {
    pub from_connection_id: String,
    pub candidate: Value,
    pub room_id: String,
}

/// Relayed `chat:private`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPrivateRelayDto {
    pub from_connection_id: String,
    pub message: Value,
    pub ts: i64,
}

/// Outbound frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerEventDto {
    #[serde(rename = "connection:ready")]
    ConnectionReady(ConnectionReadyDto),
    #[serde(rename = "presence:update")]
    PresenceUpdate(Vec<PresenceEntryDto>),
    #[serde(rename = "heartbeat:pong")]
    HeartbeatPong(Value),
    #[serde(rename = "webrtc:offer")]
    WebRtcOffer(SessionDescriptionRelayDto),
    #[serde(rename = "webrtc:answer")]
    WebRtcAnswer(SessionDescriptionRelayDto),
    #[serde(rename = "webrtc:ice-candidate")]
    IceCandidate(IceCandidateRelayDto),
    #[serde(rename = "chat:private")]
    ChatPrivate(ChatPrivateRelayDto),
}
