//! InMemory Participant Repository 実装
//!
//! ドメイン層が定義する ParticipantRepository trait の具体的な実装。
//! Room 集約を `tokio::sync::Mutex` で保護し、インメモリ DB として使用します。
//!
//! すべての操作はロックを 1 回だけ取得して完結するため、互いに線形化可能です。
//! ロックを保持したまま await することはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ParticipantId, ParticipantPatch, ParticipantRepository, ParticipantState, RepositoryError,
    Room,
};

/// インメモリ Participant Repository 実装
pub struct InMemoryParticipantRepository {
    /// Room ドメインモデル
    room: Arc<Mutex<Room>>,
}

impl InMemoryParticipantRepository {
    /// 新しい InMemoryParticipantRepository を作成
    pub fn new(room: Arc<Mutex<Room>>) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn register(&self, id: ParticipantId) -> Result<ParticipantState, RepositoryError> {
        let mut room = self.room.lock().await;
        let state = room.register(id)?;
        tracing::debug!(
            "Participant '{}' registered ({} in room)",
            state.id,
            room.participant_count()
        );
        Ok(state)
    }

    async fn get(&self, id: &ParticipantId) -> Result<ParticipantState, RepositoryError> {
        let room = self.room.lock().await;
        room.get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.as_str().to_string()))
    }

    async fn apply_partial_update(
        &self,
        id: &ParticipantId,
        patch: &ParticipantPatch,
    ) -> Result<ParticipantState, RepositoryError> {
        let mut room = self.room.lock().await;
        room.apply_patch(id, patch)
            .ok_or_else(|| RepositoryError::NotFound(id.as_str().to_string()))
    }

    async fn remove(&self, id: &ParticipantId) -> Result<ParticipantState, RepositoryError> {
        let mut room = self.room.lock().await;
        let state = room
            .remove(id)
            .ok_or_else(|| RepositoryError::NotFound(id.as_str().to_string()))?;
        tracing::debug!(
            "Participant '{}' removed ({} in room)",
            id,
            room.participant_count()
        );
        Ok(state)
    }

    async fn list_except(&self, id: &ParticipantId) -> Vec<ParticipantState> {
        let room = self.room.lock().await;
        room.participants_except(id)
    }

    async fn list_all(&self) -> Vec<ParticipantState> {
        let room = self.room.lock().await;
        room.participants()
    }

    async fn count(&self) -> usize {
        let room = self.room.lock().await;
        room.participant_count()
    }

    async fn get_room(&self) -> Room {
        let room = self.room.lock().await;
        room.clone()
    }
}
