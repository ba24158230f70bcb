//! UseCase: 他の参加者の状態取得
//!
//! 新しく参加したクライアントが「今ここに誰がいるか」を問い合わせるための
//! 1 対 1 の応答。ブロードキャストは行わない。

use std::sync::Arc;

use crate::domain::{ParticipantId, ParticipantState};

use super::room_broadcaster::RoomBroadcaster;

/// 他の参加者の状態取得のユースケース
pub struct FetchOthersUseCase {
    broadcaster: Arc<RoomBroadcaster>,
}

impl FetchOthersUseCase {
    pub fn new(broadcaster: Arc<RoomBroadcaster>) -> Self {
        Self { broadcaster }
    }

    /// 要求者以外の全参加者のスナップショットを返す
    pub async fn execute(&self, requester: &ParticipantId) -> Vec<ParticipantState> {
        self.broadcaster.snapshot_others(requester).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ParticipantPatch, ParticipantRepository, Room, RoomId, Timestamp},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
        },
    };
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    fn id(value: &str) -> ParticipantId {
        ParticipantId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_others_returns_latest_states_without_requester() {
        // テスト項目: 要求者を除く全参加者の最新状態が返される
        // given (前提条件):
        let repository = Arc::new(InMemoryParticipantRepository::new(Arc::new(Mutex::new(
            Room::new(RoomId::main(), Timestamp::new(1000)),
        ))));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
            HashMap::new(),
        ))));
        let usecase = FetchOthersUseCase::new(Arc::new(RoomBroadcaster::new(
            repository.clone(),
            message_pusher,
        )));
        repository.register(id("alice")).await.unwrap();
        repository.register(id("bob")).await.unwrap();
        repository
            .apply_partial_update(
                &id("bob"),
                &ParticipantPatch {
                    display_name: Some("Bob".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // when (操作):
        let others = usecase.execute(&id("alice")).await;

        // then (期待する結果):
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].id, id("bob"));
        assert_eq!(others[0].display_name, "Bob");
    }
}
