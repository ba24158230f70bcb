//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::ParticipantStateDto;

/// Room summary returned by `GET /api/room`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummaryDto {
    pub id: String,
    pub participants: Vec<String>,
    pub participant_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    pub created_at: String,
}

/// Full room state returned by `GET /debug/room`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub id: String,
    pub participants: Vec<ParticipantStateDto>,
    pub created_at: String,
}
