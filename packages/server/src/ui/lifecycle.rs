//! Connection lifecycle controller.
//!
//! Drives a single connection through `Connecting → Active → Disconnected`.
//! The controller is transport-agnostic: it consumes inbound text frames and
//! writes every reply into the connection's outbound queue, the same queue the
//! broadcaster uses, so replies and broadcasts reach the client in order.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::{
    domain::{ParticipantId, ParticipantState, PusherChannel},
    infrastructure::dto::websocket::{
        ClientMessage, ErrorMessage, MessageType, OthersMessage, ParticipantPatchDto,
        RoomConnectedMessage,
    },
    usecase::{ConnectError, DisconnectError, UpdateError},
};

use super::state::AppState;

/// Phase of a single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Connecting,
    Active,
    Disconnected,
}

/// Lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Illegal transition from {from:?} to {to:?}")]
    IllegalTransition {
        from: ConnectionPhase,
        to: ConnectionPhase,
    },

    #[error(transparent)]
    Connect(#[from] ConnectError),
}

/// Per-connection controller
pub struct ConnectionLifecycle {
    state: Arc<AppState>,
    id: ParticipantId,
    outbound: PusherChannel,
    phase: ConnectionPhase,
}

impl ConnectionLifecycle {
    /// Create a controller in the `Connecting` phase
    ///
    /// # Arguments
    ///
    /// * `state` - Shared application state
    /// * `id` - Identifier assigned to this connection by the transport
    /// * `outbound` - Queue drained by the connection's writer task
    pub fn new(state: Arc<AppState>, id: ParticipantId, outbound: PusherChannel) -> Self {
        Self {
            state,
            id,
            outbound,
            phase: ConnectionPhase::Connecting,
        }
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    /// `Connecting → Active`
    ///
    /// Registers the participant, notifies the room and greets the client with
    /// its own state. On failure nothing stays registered, the client receives
    /// an `error` event and the connection ends up `Disconnected`.
    pub async fn activate(&mut self) -> Result<ParticipantState, LifecycleError> {
        if self.phase != ConnectionPhase::Connecting {
            return Err(LifecycleError::IllegalTransition {
                from: self.phase,
                to: ConnectionPhase::Active,
            });
        }

        let result = self
            .state
            .connect_participant_usecase
            .execute(
                self.state.room_id.clone(),
                self.id.clone(),
                self.outbound.clone(),
            )
            .await;

        match result {
            Ok(participant) => {
                self.phase = ConnectionPhase::Active;
                self.reply(&RoomConnectedMessage {
                    r#type: MessageType::RoomConnected,
                    room: self.state.room_id.as_str().to_string(),
                    user: (&participant).into(),
                });
                Ok(participant)
            }
            Err(e) => {
                tracing::warn!("Rejected connection '{}': {}", self.id, e);
                self.phase = ConnectionPhase::Disconnected;
                self.reply(&ErrorMessage::new(e.to_string(), None));
                Err(e.into())
            }
        }
    }

    /// Handle one inbound text frame while `Active`
    pub async fn handle_text(&mut self, text: &str) {
        if self.phase != ConnectionPhase::Active {
            tracing::warn!(
                "Ignoring message from '{}' in phase {:?}",
                self.id,
                self.phase
            );
            return;
        }

        tracing::debug!("Received text from '{}': {}", self.id, text);

        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to parse message from '{}': {}", self.id, e);
                self.reply(&ErrorMessage::new(format!("Malformed message: {e}"), None));
                return;
            }
        };

        match message {
            ClientMessage::FetchOthers { request_id } => self.fetch_others(request_id).await,
            ClientMessage::EmitUserUpdate { state } => self.update(state).await,
        }
    }

    /// `Active → Disconnected`
    ///
    /// Safe to call any number of times; only the first call on an active
    /// connection removes the participant and broadcasts the departure.
    pub async fn teardown(&mut self) {
        let previous = self.phase;
        self.phase = ConnectionPhase::Disconnected;

        match previous {
            ConnectionPhase::Active => {
                match self
                    .state
                    .disconnect_participant_usecase
                    .execute(&self.state.room_id, &self.id)
                    .await
                {
                    Ok(_) => tracing::info!("Client '{}' disconnected", self.id),
                    Err(DisconnectError::NotFound(_)) => {
                        tracing::debug!("Client '{}' was already removed", self.id);
                    }
                }
            }
            ConnectionPhase::Connecting | ConnectionPhase::Disconnected => {
                tracing::debug!("Teardown of '{}' in phase {:?} is a no-op", self.id, previous);
            }
        }
    }

    async fn fetch_others(&self, request_id: Option<u64>) {
        let others = self.state.fetch_others_usecase.execute(&self.id).await;
        tracing::debug!("Sending {} participant(s) to '{}'", others.len(), self.id);
        self.reply(&OthersMessage {
            r#type: MessageType::Others,
            request_id,
            users: others.iter().map(Into::into).collect(),
        });
    }

    async fn update(&self, payload: ParticipantPatchDto) {
        let (target, patch) = match payload.into_domain() {
            Ok(parts) => parts,
            Err(e) => {
                tracing::warn!("Invalid update from '{}': {}", self.id, e);
                self.reply(&ErrorMessage::new(format!("Invalid update: {e}"), None));
                return;
            }
        };

        let result = self
            .state
            .update_participant_usecase
            .execute(&self.state.room_id, &self.id, target, patch)
            .await;

        match result {
            Ok(_) => {}
            Err(UpdateError::NotFound(_)) => {
                tracing::warn!("Dropped update from '{}': participant is gone", self.id);
            }
            Err(e @ (UpdateError::ForeignTarget { .. } | UpdateError::InvalidPatch(_))) => {
                tracing::warn!("Rejected update from '{}': {}", self.id, e);
                self.reply(&ErrorMessage::new(e.to_string(), None));
            }
        }
    }

    fn reply<T: Serialize>(&self, message: &T) {
        let json = match serde_json::to_string(message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to encode reply for '{}': {}", self.id, e);
                return;
            }
        };
        if let Err(e) = self.outbound.try_send(json) {
            tracing::warn!("Failed to reply to '{}': {}", self.id, e);
        }
    }
}
