//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 参加者の削除と、残りの参加者への切断通知
//!
//! ### なぜこのテストが必要か
//! - トランスポート層が切断を複数回通知しても、切断通知は 1 回しか送られないことを保証
//! - 最後の参加者が切断した場合も正しく処理されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断と通知
//! - エッジケース：最後の参加者の切断（通知対象なし）
//! - 異常系：二重切断、存在しない参加者の切断

use std::sync::Arc;

use crate::domain::{
    MessagePusher, ParticipantId, ParticipantRepository, ParticipantState, RoomId,
};

use super::{error::DisconnectError, room_broadcaster::RoomBroadcaster};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// RoomBroadcaster（切断通知）
    broadcaster: Arc<RoomBroadcaster>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            broadcaster,
        }
    }

    /// 参加者切断を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 参加していた Room
    /// * `id` - 切断するクライアントの参加者 ID
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantState)` - 削除した参加者の最後の状態（残りの全員に通知済み）
    /// * `Err(DisconnectError)` - 既に切断済み（通知は送らない）
    pub async fn execute(
        &self,
        room: &RoomId,
        id: &ParticipantId,
    ) -> Result<ParticipantState, DisconnectError> {
        // 1. Repository から参加者を削除
        let removed = self.repository.remove(id).await;

        // 2. MessagePusher からクライアントを登録解除（二重切断でも問題ない）
        self.message_pusher.unregister_client(id).await;

        let state = removed.map_err(|_| DisconnectError::NotFound(id.as_str().to_string()))?;

        // 3. 残りの全員に通知
        let notified = self.broadcaster.notify_leave(room, &state).await;
        tracing::info!(
            "Participant '{}' left room '{}' ({} notified)",
            id,
            room,
            notified
        );

        Ok(state)
    }

    /// 残りの参加者数を取得
    pub async fn count_remaining_participants(&self) -> usize {
        self.repository.count().await
    }
}
