//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::PresenceEntryDto;

/// Query parameters of `GET /presence`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceQuery {
    pub room_id: Option<String>,
}

/// Response of `GET /presence`
#[derive(Debug, Serialize, Deserialize)]
pub struct PresenceResponseDto {
    pub clients: Vec<PresenceEntryDto>,
}

/// Response of `GET /hostname`
#[derive(Debug, Serialize, Deserialize)]
pub struct HostnameResponseDto {
    pub hostname: String,
}

/// One element of `GET /api/rooms`
#[derive(Debug, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub members: Vec<String>,
}
