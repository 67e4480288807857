//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    domain::RoomId,
    infrastructure::dto::{
        http::{HostnameResponseDto, PresenceQuery, PresenceResponseDto, RoomSummaryDto},
        websocket::PresenceEntryDto,
    },
    ui::state::AppState,
};

/// Presence snapshot across all rooms, or one room with `?roomId=`
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PresenceQuery>,
) -> Json<PresenceResponseDto> {
    let room_id = query.room_id.map(RoomId::new);
    let snapshot = state.get_presence_usecase.execute(room_id).await;

    // Domain Model から DTO への変換
    let clients = snapshot.into_iter().map(PresenceEntryDto::from).collect();

    Json(PresenceResponseDto { clients })
}

/// Host name this server was started with
pub async fn get_hostname(State(state): State<Arc<AppState>>) -> Json<HostnameResponseDto> {
    Json(HostnameResponseDto {
        hostname: state.hostname.clone(),
    })
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of occupied rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    let summaries = rooms
        .into_iter()
        .map(|(room_id, members)| RoomSummaryDto {
            id: room_id.into_string(),
            members: members.into_iter().map(|id| id.into_string()).collect(),
        })
        .collect();

    Json(summaries)
}
