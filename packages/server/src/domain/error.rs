//! Domain 層のエラー型

use thiserror::Error;

/// 値オブジェクト生成・検証時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// 識別子が空文字列
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// 文字数上限の超過
    #[error("{field} is too long ({actual} > {max} characters)")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// 座標が有限値ではない
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

/// Room 集約の不変条件違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Participant '{0}' is already registered")]
    DuplicateParticipant(String),

    #[error("Room capacity of {0} participants exceeded")]
    CapacityExceeded(usize),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 同じ ID の参加者が既に登録されている
    #[error("Participant '{0}' is already registered")]
    DuplicateId(String),

    /// 参加者が存在しない（更新と切断の競合で通常起こりうる）
    #[error("Participant '{0}' not found")]
    NotFound(String),

    /// Room の定員超過
    #[error("Room is full ({0} participants)")]
    RoomFull(usize),
}

impl From<RoomError> for RepositoryError {
    fn from(error: RoomError) -> Self {
        match error {
            RoomError::DuplicateParticipant(id) => Self::DuplicateId(id),
            RoomError::CapacityExceeded(capacity) => Self::RoomFull(capacity),
        }
    }
}

/// メッセージ送信時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先のクライアントが登録されていない
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// 同じ ID のクライアントが既に登録されている
    #[error("Client '{0}' is already registered")]
    AlreadyRegistered(String),

    /// チャンネルへの送信に失敗（受信側が既に閉じている）
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
