//! Room Broadcaster
//!
//! 状態変化を正しい宛先集合へファンアウトする。
//!
//! 宛先は Repository のスナップショットから決め、Repository のロックを
//! 解放してから MessagePusher に渡す。宛先ごとの配信失敗は MessagePusher が
//! ログに残して読み飛ばすため、呼び出し元の操作には影響しない。

use std::sync::Arc;

use crate::domain::{
    MessagePusher, ParticipantId, ParticipantRepository, ParticipantState, PresenceEvent, RoomId,
};

/// Room 内へのイベント配信
pub struct RoomBroadcaster {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ParticipantRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RoomBroadcaster {
    /// 新しい RoomBroadcaster を作成
    pub fn new(
        repository: Arc<dyn ParticipantRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 新規参加者の情報を、本人以外の全員に通知
    ///
    /// # Returns
    ///
    /// 配信できた宛先の数
    pub async fn notify_join(
        &self,
        room: &RoomId,
        participant: &ParticipantState,
        exclude_id: &ParticipantId,
    ) -> usize {
        let targets = self.targets_except(exclude_id).await;
        self.message_pusher
            .broadcast(room, targets, &PresenceEvent::Joined(participant.clone()))
            .await
    }

    /// 更新後の完全な状態を、送信者以外の全員に通知
    pub async fn notify_update(
        &self,
        room: &RoomId,
        participant: &ParticipantState,
        exclude_id: &ParticipantId,
    ) -> usize {
        let targets = self.targets_except(exclude_id).await;
        self.message_pusher
            .broadcast(room, targets, &PresenceEvent::Updated(participant.clone()))
            .await
    }

    /// 切断した参加者の最後の状態を、残っている全員に通知
    ///
    /// 切断した参加者は Repository から削除済みのため宛先に含まれない。
    pub async fn notify_leave(&self, room: &RoomId, participant: &ParticipantState) -> usize {
        let targets = self
            .repository
            .list_all()
            .await
            .into_iter()
            .map(|state| state.id)
            .collect();
        self.message_pusher
            .broadcast(room, targets, &PresenceEvent::Left(participant.clone()))
            .await
    }

    /// 指定した参加者以外の現在の状態（要求者への 1 対 1 の応答用）
    pub async fn snapshot_others(&self, exclude_id: &ParticipantId) -> Vec<ParticipantState> {
        self.repository.list_except(exclude_id).await
    }

    async fn targets_except(&self, exclude_id: &ParticipantId) -> Vec<ParticipantId> {
        self.repository
            .list_except(exclude_id)
            .await
            .into_iter()
            .map(|state| state.id)
            .collect()
    }
}
