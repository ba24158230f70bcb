//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame tagged with a `type` field. Participant
//! states use the field names the browser client expects
//! (`name`, `velX`, `velY`, ...).

use serde::{Deserialize, Serialize};

/// Outbound message type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    RoomConnected,
    Others,
    UserAdd,
    UserUpdate,
    UserDelete,
    Error,
}

/// Full participant state on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStateDto {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub message: String,
    pub color: String,
}

/// Partial participant state submitted by a client
///
/// Every field is optional. `id`, when present, names the update target and
/// must be the sender's own id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPatchDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel_y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Inbound client message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Request for the current world state (answered with `others`)
    FetchOthers {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
    },
    /// Partial or full state update of the sender
    EmitUserUpdate { state: ParticipantPatchDto },
}

/// Greeting sent to a newly connected client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomConnectedMessage {
    pub r#type: MessageType,
    pub room: String,
    pub user: ParticipantStateDto,
}

/// Reply to `fetch-others`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OthersMessage {
    pub r#type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
    pub users: Vec<ParticipantStateDto>,
}

/// `user-add` / `user-update` / `user-delete` broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantEventMessage {
    pub r#type: MessageType,
    pub user: ParticipantStateDto,
}

/// Error reported to the connection whose request failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub r#type: MessageType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<u64>,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>, request_id: Option<u64>) -> Self {
        Self {
            r#type: MessageType::Error,
            message: message.into(),
            request_id,
        }
    }
}
