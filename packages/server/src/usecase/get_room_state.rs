//! UseCase: Room 状態取得（HTTP API 用）

use std::sync::Arc;

use crate::domain::{ParticipantRepository, Room};

/// Room 状態取得のユースケース
pub struct GetRoomStateUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ParticipantRepository>,
}

impl GetRoomStateUseCase {
    pub fn new(repository: Arc<dyn ParticipantRepository>) -> Self {
        Self { repository }
    }

    /// Room 集約のスナップショットを返す
    pub async fn execute(&self) -> Room {
        self.repository.get_room().await
    }
}
