//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    ParticipantId, ParticipantPatch, ParticipantState, PresenceEvent, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl dto::ParticipantPatchDto {
    /// Split the payload into its optional target id and the domain patch
    pub fn into_domain(self) -> Result<(Option<ParticipantId>, ParticipantPatch), ValueObjectError> {
        let target = self.id.map(ParticipantId::try_from).transpose()?;
        let patch = ParticipantPatch {
            display_name: self.name,
            x: self.x,
            y: self.y,
            vel_x: self.vel_x,
            vel_y: self.vel_y,
            message: self.message,
            color: self.color,
        };
        Ok((target, patch))
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ParticipantState> for dto::ParticipantStateDto {
    fn from(model: ParticipantState) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.display_name,
            x: model.position.x,
            y: model.position.y,
            vel_x: model.velocity.x,
            vel_y: model.velocity.y,
            message: model.message,
            color: model.color,
        }
    }
}

impl From<&ParticipantState> for dto::ParticipantStateDto {
    fn from(model: &ParticipantState) -> Self {
        model.clone().into()
    }
}

impl From<&PresenceEvent> for dto::ParticipantEventMessage {
    fn from(event: &PresenceEvent) -> Self {
        let r#type = match event {
            PresenceEvent::Joined(_) => dto::MessageType::UserAdd,
            PresenceEvent::Updated(_) => dto::MessageType::UserUpdate,
            PresenceEvent::Left(_) => dto::MessageType::UserDelete,
        };
        Self {
            r#type,
            user: event.participant().into(),
        }
    }
}
