//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 参加者の登録（重複チェック、定員チェック）と参加通知
//!
//! ### なぜこのテストが必要か
//! - 登録に失敗した接続が Registry にも MessagePusher にも残らないことを保証
//! - 新規参加者が既存の全員に通知され、本人には通知されないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の接続
//! - 異常系：重複した ID での接続試行、Room の定員超過

use std::sync::Arc;

use crate::domain::{
    MessagePusher, ParticipantId, ParticipantRepository, ParticipantState,
    PusherChannel, RepositoryError, RoomId,
};

use super::{error::ConnectError, room_broadcaster::RoomBroadcaster};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// RoomBroadcaster（参加通知）
    broadcaster: Arc<RoomBroadcaster>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
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

    /// 参加者接続を実行
    ///
    /// 送信キューを先に登録してから Registry に登録するため、Registry に
    /// 現れた時点から他の参加者のイベントの宛先になる。
    ///
    /// # Arguments
    ///
    /// * `room` - 参加する Room
    /// * `id` - トランスポート層が払い出した参加者 ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(ParticipantState)` - 接続成功（デフォルト状態）
    /// * `Err(ConnectError)` - 接続失敗（何も登録されずに終わる）
    pub async fn execute(
        &self,
        room: RoomId,
        id: ParticipantId,
        sender: PusherChannel,
    ) -> Result<ParticipantState, ConnectError> {
        // 1. MessagePusher に送信キューを登録
        self.message_pusher
            .register_client(room.clone(), id.clone(), sender)
            .await
            .map_err(|_| ConnectError::DuplicateParticipantId(id.as_str().to_string()))?;

        // 2. Repository に参加者を登録（失敗したら送信キューの登録を取り消す）
        let state = match self.repository.register(id.clone()).await {
            Ok(state) => state,
            Err(e) => {
                self.message_pusher.unregister_client(&id).await;
                return Err(match e {
                    RepositoryError::RoomFull(capacity) => ConnectError::RoomFull(capacity),
                    RepositoryError::DuplicateId(id) | RepositoryError::NotFound(id) => {
                        ConnectError::DuplicateParticipantId(id)
                    }
                });
            }
        };

        // 3. 既存の参加者に通知
        let notified = self.broadcaster.notify_join(&room, &state, &id).await;
        tracing::info!(
            "Participant '{}' joined room '{}' ({} notified)",
            id,
            room,
            notified
        );

        Ok(state)
    }
}
