//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{RoomDetailDto, RoomSummaryDto},
    ui::state::AppState,
};
use hiroba_shared::time::timestamp_to_rfc3339;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Summary of the room: who is connected, and how many
pub async fn get_room(State(state): State<Arc<AppState>>) -> Json<RoomSummaryDto> {
    let room = state.get_room_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(RoomSummaryDto {
        id: room.id.as_str().to_string(),
        participants: room
            .participants()
            .iter()
            .map(|p| p.id.as_str().to_string())
            .collect(),
        participant_count: room.participant_count(),
        capacity: room.capacity(),
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    })
}

/// Debug endpoint returning every participant's full state (for testing purposes)
pub async fn debug_room_state(State(state): State<Arc<AppState>>) -> Json<RoomDetailDto> {
    let room = state.get_room_state_usecase.execute().await;

    Json(RoomDetailDto {
        id: room.id.as_str().to_string(),
        participants: room.participants().iter().map(Into::into).collect(),
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    })
}
