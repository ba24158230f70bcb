//! 値オブジェクト

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// 参加者 ID の最大文字数
pub const PARTICIPANT_ID_MAX_LENGTH: usize = 64;

/// 単一ルーム構成で使用する Room ID
pub const MAIN_ROOM_ID: &str = "main-room";

/// 参加者（接続）の識別子
///
/// 接続受付時にトランスポート層が払い出し、接続が続く間は変わらない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("participant id"));
        }
        let length = value.chars().count();
        if length > PARTICIPANT_ID_MAX_LENGTH {
            return Err(ValueObjectError::TooLong {
                field: "participant id",
                max: PARTICIPANT_ID_MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ParticipantId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 参加者 ID の払い出し
pub struct ParticipantIdFactory;

impl ParticipantIdFactory {
    /// ランダムな UUID v4 から参加者 ID を生成
    pub fn generate() -> ParticipantId {
        ParticipantId(Uuid::new_v4().to_string())
    }
}

/// Room の識別子
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::Empty("room id"));
        }
        Ok(Self(value))
    }

    /// 単一ルーム構成のデフォルト Room
    pub fn main() -> Self {
        Self(MAIN_ROOM_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unix タイムスタンプ（UTC、ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_accepts_non_empty_value() {
        // テスト項目: 空でない文字列から参加者 ID を生成できる
        // given (前提条件):
        let value = "alice".to_string();

        // when (操作):
        let result = ParticipantId::new(value);

        // then (期待する結果):
        assert_eq!(result.unwrap().as_str(), "alice");
    }

    #[test]
    fn test_participant_id_rejects_empty_value() {
        // テスト項目: 空文字列の参加者 ID はエラーになる
        // given (前提条件):
        let value = String::new();

        // when (操作):
        let result = ParticipantId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::Empty("participant id")));
    }

    #[test]
    fn test_participant_id_rejects_too_long_value() {
        // テスト項目: 上限を超える長さの参加者 ID はエラーになる
        // given (前提条件):
        let value = "a".repeat(PARTICIPANT_ID_MAX_LENGTH + 1);

        // when (操作):
        let result = ParticipantId::try_from(value);

        // then (期待する結果):
        assert!(matches!(result, Err(ValueObjectError::TooLong { .. })));
    }

    #[test]
    fn test_generated_participant_ids_are_unique() {
        // テスト項目: 払い出された参加者 ID は重複しない
        // given (前提条件):

        // when (操作):
        let first = ParticipantIdFactory::generate();
        let second = ParticipantIdFactory::generate();

        // then (期待する結果):
        assert_ne!(first, second);
        assert!(ParticipantId::new(first.into_string()).is_ok());
    }

    #[test]
    fn test_main_room_id() {
        // テスト項目: デフォルトの Room ID は main-room
        // given (前提条件):

        // when (操作):
        let room_id = RoomId::main();

        // then (期待する結果):
        assert_eq!(room_id.as_str(), MAIN_ROOM_ID);
        assert!(RoomId::new(String::new()).is_err());
    }
}
