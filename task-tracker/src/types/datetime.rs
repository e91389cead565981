use chrono::{NaiveDateTime, Utc};

/// タイムスタンプはオフセットなし（UTC 基準）で扱う
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// `2099-01-01T00:00:00` 形式（小数秒は任意）を解釈する
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    value.parse::<NaiveDateTime>().ok()
}
