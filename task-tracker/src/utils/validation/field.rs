// src/utils/validation/field.rs

//! DTO のフィールド表
//!
//! 実行時のリフレクションは使わず、DTO ごとに「名前・型・代入先」を列挙する。

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::types::datetime;

/// フィールドの意味的な型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Boolean,
    Text,
    DateTime,
}

impl FieldKind {
    /// エラーメッセージに出す型名
    pub fn type_name(self) -> &'static str {
        match self {
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::Text => "string",
            FieldKind::DateTime => "datetime",
        }
    }

    /// JSON 値の形がこの型に合うか。`null` は「値なし」として常に受け付ける
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (FieldKind::Integer, Value::Number(n)) => n.is_i64(),
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Text, Value::String(_)) => true,
            (FieldKind::DateTime, Value::String(s)) => datetime::parse_timestamp(s).is_some(),
            _ => false,
        }
    }

    /// パス・クエリの文字列をこの型に変換する
    pub fn coerce(self, raw: &str) -> Result<ParamValue, String> {
        let value = match self {
            FieldKind::Integer => raw.trim().parse::<i64>().ok().map(ParamValue::Integer),
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Some(ParamValue::Boolean(true)),
                "false" => Some(ParamValue::Boolean(false)),
                _ => None,
            },
            FieldKind::Text => Some(ParamValue::Text(raw.to_string())),
            FieldKind::DateTime => datetime::parse_timestamp(raw.trim()).map(ParamValue::DateTime),
        };

        value.ok_or_else(|| format!("Expected {} but got \"{}\"", self.type_name(), raw))
    }
}

/// JSON 値の型名（`Expected ... but got <ここ>`）
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 変換済みのパラメータ値
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Integer(i64),
    Boolean(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl ParamValue {
    pub fn into_integer(self) -> Option<i64> {
        match self {
            ParamValue::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_boolean(self) -> Option<bool> {
        match self {
            ParamValue::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_datetime(self) -> Option<NaiveDateTime> {
        match self {
            ParamValue::DateTime(v) => Some(v),
            _ => None,
        }
    }
}

/// ボディ DTO のフィールド宣言
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyField {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl BodyField {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// パス・クエリ DTO のフィールド宣言。`assign` で変換済みの値を DTO に格納する
pub struct Param<D> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub assign: fn(&mut D, ParamValue),
}

impl<D> Param<D> {
    pub fn new(name: &'static str, kind: FieldKind, assign: fn(&mut D, ParamValue)) -> Self {
        Self { name, kind, assign }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(FieldKind::Integer.coerce("42"), Ok(ParamValue::Integer(42)));
        assert_eq!(FieldKind::Integer.coerce("-1"), Ok(ParamValue::Integer(-1)));
        assert_eq!(
            FieldKind::Integer.coerce("abc"),
            Err("Expected integer but got \"abc\"".to_string())
        );
        assert!(FieldKind::Integer.coerce("4.2").is_err());
    }

    #[test]
    fn test_coerce_boolean_is_strict() {
        assert_eq!(FieldKind::Boolean.coerce("TRUE"), Ok(ParamValue::Boolean(true)));
        assert_eq!(FieldKind::Boolean.coerce("false"), Ok(ParamValue::Boolean(false)));
        assert!(FieldKind::Boolean.coerce("yes").is_err());
        assert!(FieldKind::Boolean.coerce("1").is_err());
    }

    #[test]
    fn test_coerce_datetime() {
        assert!(FieldKind::DateTime.coerce("2099-01-01T00:00:00").is_ok());
        assert_eq!(
            FieldKind::DateTime.coerce("soon"),
            Err("Expected datetime but got \"soon\"".to_string())
        );
    }

    #[test]
    fn test_accepts_json_shapes() {
        assert!(FieldKind::Text.accepts(&json!("title")));
        assert!(FieldKind::Text.accepts(&Value::Null));
        assert!(!FieldKind::Text.accepts(&json!(5)));
        assert!(FieldKind::Integer.accepts(&json!(5)));
        assert!(!FieldKind::Integer.accepts(&json!(5.5)));
        assert!(FieldKind::DateTime.accepts(&json!("2099-01-01T00:00:00")));
        assert!(!FieldKind::DateTime.accepts(&json!("2099-01-01T00:00:00Z")));
        assert!(!FieldKind::Boolean.accepts(&json!("true")));
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(1)), "number");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
