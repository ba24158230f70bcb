//! UseCase: 参加者の状態更新
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - UpdateParticipantUseCase::execute() メソッド
//! - 部分更新のマージと、送信者以外へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 接続は自分自身の状態しか更新できないことを保証
//! - 切断と競合した更新が黙って破棄され、何も配信されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：自分の状態の部分更新
//! - 異常系：他人の ID を指定した更新、上限を超えるフィールド、切断済みの参加者への更新

use std::sync::Arc;

use crate::domain::{
    ParticipantId, ParticipantPatch, ParticipantRepository, ParticipantState, RoomId,
};

use super::{error::UpdateError, room_broadcaster::RoomBroadcaster};

/// 参加者の状態更新のユースケース
pub struct UpdateParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// RoomBroadcaster（更新通知）
    broadcaster: Arc<RoomBroadcaster>,
}

impl UpdateParticipantUseCase {
    /// 新しい UpdateParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        broadcaster: Arc<RoomBroadcaster>,
    ) -> Self {
        Self {
            repository,
            broadcaster,
        }
    }

    /// 状態更新を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信者の Room
    /// * `sender` - 更新を送信した接続の参加者 ID
    /// * `target` - ペイロードで指定された更新対象（省略時は送信者）
    /// * `patch` - 部分更新
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantState)` - マージ後の完全な状態（送信者以外に配信済み）
    /// * `Err(UpdateError)` - 更新失敗（何も配信されない）
    pub async fn execute(
        &self,
        room: &RoomId,
        sender: &ParticipantId,
        target: Option<ParticipantId>,
        patch: ParticipantPatch,
    ) -> Result<ParticipantState, UpdateError> {
        // 1. 自分以外の参加者は更新できない
        if let Some(target) = target
            && &target != sender
        {
            return Err(UpdateError::ForeignTarget {
                sender: sender.as_str().to_string(),
                target: target.into_string(),
            });
        }

        // 2. パッチの検証
        patch.validate()?;

        // 3. Repository に部分更新を適用
        let state = self
            .repository
            .apply_partial_update(sender, &patch)
            .await
            .map_err(|_| UpdateError::NotFound(sender.as_str().to_string()))?;

        // 4. 送信者以外にブロードキャスト
        let notified = self.broadcaster.notify_update(room, &state, sender).await;
        tracing::debug!("Participant '{}' updated ({} notified)", sender, notified);

        Ok(state)
    }
}
