//! Conversion logic between DTOs and domain entities.

use crate::domain::{Connection, ServerEvent, SignalKind};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Connection> for dto::PresenceEntryDto {
    fn from(model: Connection) -> Self {
        Self {
            id: model.id.into_string(),
            role: model.role.into_string(),
            hostname: model.hostname,
            last_heartbeat_at: model.last_heartbeat_at.value(),
            latency_ms: model.latency_ms,
            room_id: model.room_id.into_string(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerEventDto {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::ConnectionReady { connection_id } => {
                Self::ConnectionReady(dto::ConnectionReadyDto {
                    connection_id: connection_id.as_str().to_string(),
                })
            }
            ServerEvent::PresenceUpdate(snapshot) => Self::PresenceUpdate(
                snapshot
                    .iter()
                    .cloned()
                    .map(dto::PresenceEntryDto::from)
                    .collect(),
            ),
            ServerEvent::HeartbeatPong(value) => Self::HeartbeatPong(value.clone()),
            ServerEvent::Signal {
                kind,
                from,
                body,
                room_id,
            } => {
                let from_connection_id = from.as_str().to_string();
                let room_id = room_id.as_str().to_string();
                match kind {
                    SignalKind::Offer => Self::WebRtcOffer(dto::SessionDescriptionRelayDto {
                        from_connection_id,
                        sdp: body.clone(),
                        room_id,
                    }),
                    SignalKind::Answer => Self::WebRtcAnswer(dto::SessionDescriptionRelayDto {
                        from_connection_id,
                        sdp: body.clone(),
                        room_id,
                    }),
                    SignalKind::IceCandidate => Self::IceCandidate(dto::IceCandidateRelayDto {
                        from_connection_id,
                        candidate: body.clone(),
                        room_id,
                    }),
                }
            }
            ServerEvent::PrivateChat { from, message, ts } => {
                Self::ChatPrivate(dto::ChatPrivateRelayDto {
                    from_connection_id: from.as_str().to_string(),
                    message: message.clone(),
                    ts: ts.value(),
                })
            }
        }
    }
}

/// Encode a domain event as an outbound text frame.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerEventDto::from(event))
}
