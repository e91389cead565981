// src/utils/validation/common.rs

//! 共通バリデーション定数と関数
//!
//! DTO 固有のメッセージは各 DTO 側で付ける。

use chrono::NaiveDateTime;
use validator::ValidationError;

use crate::types::datetime;

// =============================================================================
// バリデーション定数
// =============================================================================

/// タスク関連の制約
pub mod task {
    pub const TITLE_MIN_LENGTH: u64 = 3;
    pub const TITLE_MAX_LENGTH: u64 = 32;
}

// =============================================================================
// カスタムバリデーション関数
// =============================================================================

/// 文字列が空白のみでないかをチェック
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Field cannot be empty or contain only whitespace".into());
        return Err(error);
    }
    Ok(())
}

/// 現在以降の日時かをチェック（判定時点の UTC と比較）
pub fn validate_future_or_present(value: &NaiveDateTime) -> Result<(), ValidationError> {
    if *value < datetime::now() {
        let mut error = ValidationError::new("future_or_present");
        error.message = Some("Date must be in present or in future".into());
        return Err(error);
    }
    Ok(())
}

// =============================================================================
// テスト
// =============================================================================
