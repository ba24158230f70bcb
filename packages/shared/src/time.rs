//! Time-related utilities.

use chrono::{DateTime, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in UTC
///
/// Out-of-range timestamps fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_millis)
        .unwrap_or_default()
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_positive() {
        // テスト項目: 現在時刻のタイムスタンプが正の値である
        // given (前提条件):

        // when (操作):
        let timestamp = now_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_timestamp_to_rfc3339_epoch() {
        // テスト項目: Unix エポックが RFC 3339 形式に変換される
        // given (前提条件):
        let timestamp = 0;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_timestamp_to_rfc3339_keeps_millis() {
        // テスト項目: ミリ秒が保持された RFC 3339 文字列が返される
        // given (前提条件):
        let timestamp = 1_700_000_000_123;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert_eq!(result, "2023-11-14T22:13:20.123+00:00");
    }
}
