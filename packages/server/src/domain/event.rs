//! 参加者に配信するドメインイベント

use super::entity::ParticipantState;

/// Room 内の参加者の状態変化
///
/// いずれのバリアントも参加者の完全な状態を運ぶ。受信側は置き換えで反映する。
#[derive(Debug, Clone, PartialEq)]
pub enum PresenceEvent {
    /// 参加者が Room に加わった
    Joined(ParticipantState),
    /// 参加者が自分の状態を更新した（マージ後の完全な状態）
    Updated(ParticipantState),
    /// 参加者が切断した（最後の状態）
    Left(ParticipantState),
}

impl PresenceEvent {
    pub fn participant(&self) -> &ParticipantState {
        match self {
            Self::Joined(state) | Self::Updated(state) | Self::Left(state) => state,
        }
    }

    /// ログ出力用のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Joined(_) => "joined",
            Self::Updated(_) => "updated",
            Self::Left(_) => "left",
        }
    }
}
