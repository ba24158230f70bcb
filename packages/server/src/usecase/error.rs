//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::ValueObjectError;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    /// 同じ ID の参加者が既に接続している（トランスポート層の ID 再利用）
    #[error("Participant '{0}' is already connected")]
    DuplicateParticipantId(String),

    /// Room の定員超過
    #[error("Room is full ({0} participants)")]
    RoomFull(usize),
}

/// 状態更新のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// 送信者以外の参加者を更新しようとした
    #[error("Participant '{sender}' cannot update participant '{target}'")]
    ForeignTarget { sender: String, target: String },

    /// パッチが不正
    #[error("Invalid update: {0}")]
    InvalidPatch(#[from] ValueObjectError),

    /// 参加者が既に存在しない（切断との競合）
    #[error("Participant '{0}' not found")]
    NotFound(String),
}

/// 参加者切断のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisconnectError {
    /// 既に切断済み
    #[error("Participant '{0}' is already disconnected")]
    NotFound(String),
}
