// src/utils/validation/mod.rs

//! リクエストバリデーション
//!
//! パス・クエリ・ボディの3つの入力元から DTO を組み立て、最後に共通の制約チェック
//! (`validator::Validate`) を行う。違反は最初の1件で止めず、すべて集約して返す。
//!
//! - `from_body`  : JSON ボディ（未宣言キー、型不一致、制約違反）
//! - `from_path`  : パスパラメータ（文字列 → 型変換、制約違反）
//! - `from_query` : クエリパラメータ（同上、エラーコードのみ異なる）

pub mod common;
pub mod field;

pub use field::{json_type_name, BodyField, FieldKind, Param, ParamValue};

use serde::de::DeserializeOwned;
use serde_json::{error::Category, Value};
use std::collections::HashMap;
use validator::Validate;

use crate::error::{collect_field_errors, AppError, AppResult, ErrorCode, FieldErrors};

/// JSON ボディから組み立てる DTO
pub trait BodyDto: DeserializeOwned + Validate {
    /// 受け付けるキーとその型
    fn fields() -> Vec<BodyField>;
}

/// パス・クエリの文字列から組み立てる DTO
pub trait ParamDto: Default + Validate {
    fn params() -> Vec<Param<Self>>;
}

/// パラメータの入力元
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSource {
    Path,
    Query,
}

impl ParamSource {
    /// 型変換に失敗したときのエラーコード
    pub fn error_code(self) -> ErrorCode {
        match self {
            ParamSource::Path => ErrorCode::ValidationFailed,
            ParamSource::Query => ErrorCode::InvalidQueryParameters,
        }
    }

    fn message(self) -> &'static str {
        match self {
            ParamSource::Path => "Invalid path parameters",
            ParamSource::Query => "Invalid query parameters",
        }
    }
}

/// JSON ボディを DTO に変換して制約をチェックする
pub fn from_body<D: BodyDto>(raw: &[u8]) -> AppResult<D> {
    let value: Value = serde_json::from_slice(raw).map_err(json_parse_error)?;

    let Value::Object(object) = &value else {
        return Err(AppError::validation_failed(
            "Invalid request body",
            single_error("body", format!("Expected object but got {}", json_type_name(&value))),
        ));
    };

    let fields = D::fields();

    // 未宣言のキー
    let unknown: FieldErrors = object
        .keys()
        .filter(|key| !fields.iter().any(|field| field.name == key.as_str()))
        .map(|key| (key.clone(), "Unexpected field".to_string()))
        .collect();
    if !unknown.is_empty() {
        return Err(
            AppError::new(ErrorCode::UnknownProperty, "Request contains unexpected property")
                .with_field_errors(unknown),
        );
    }

    // 型の不一致（全フィールド分を集約）
    let mismatches: FieldErrors = fields
        .iter()
        .filter_map(|field| {
            let value = object.get(field.name)?;
            if field.kind.accepts(value) {
                return None;
            }
            Some((
                field.name.to_string(),
                format!(
                    "Expected {} but got {}",
                    field.kind.type_name(),
                    json_type_name(value)
                ),
            ))
        })
        .collect();
    if !mismatches.is_empty() {
        return Err(AppError::validation_failed("Invalid request body", mismatches));
    }

    let dto: D = serde_json::from_value(value).map_err(|e| {
        AppError::new(ErrorCode::JsonMappingError, "Invalid JSON format")
            .with_field_errors(single_error("body", e.to_string()))
    })?;

    check_constraints(&dto)?;
    Ok(dto)
}

/// パスパラメータから DTO を組み立てる
pub fn from_path<D: ParamDto>(params: &HashMap<String, String>) -> AppResult<D> {
    from_params(params, ParamSource::Path)
}

/// クエリパラメータから DTO を組み立てる
pub fn from_query<D: ParamDto>(params: &HashMap<String, String>) -> AppResult<D> {
    from_params(params, ParamSource::Query)
}

fn from_params<D: ParamDto>(params: &HashMap<String, String>, source: ParamSource) -> AppResult<D> {
    let mut dto = D::default();
    let mut coercion_errors = FieldErrors::new();

    for param in D::params() {
        // 未指定なら None のまま
        let Some(raw) = params.get(param.name) else {
            continue;
        };
        match param.kind.coerce(raw) {
            Ok(value) => (param.assign)(&mut dto, value),
            Err(reason) => {
                coercion_errors.insert(param.name.to_string(), reason);
            }
        }
    }

    let mut constraint_errors = match dto.validate() {
        Ok(()) => FieldErrors::new(),
        Err(errors) => collect_field_errors(&errors),
    };

    if !coercion_errors.is_empty() {
        // 変換に失敗したフィールドは制約違反として二重に報告しない
        constraint_errors.retain(|field, _| !coercion_errors.contains_key(field));
        return Err(AppError::new(source.error_code(), source.message())
            .with_field_errors(coercion_errors)
            .with_field_errors(constraint_errors));
    }

    if !constraint_errors.is_empty() {
        return Err(AppError::validation_failed("Validation failed", constraint_errors));
    }

    Ok(dto)
}

/// 制約チェックのみ（全違反を集約して VALIDATION_FAILED）
pub fn check_constraints<D: Validate>(dto: &D) -> AppResult<()> {
    dto.validate().map_err(AppError::from)
}

fn json_parse_error(err: serde_json::Error) -> AppError {
    let category = match err.classify() {
        Category::Io => "io",
        Category::Syntax => "syntax",
        Category::Data => "data",
        Category::Eof => "eof",
    };

    AppError::new(ErrorCode::JsonParseError, "Invalid JSON format")
        .with_detail("category", category)
        .with_detail("line", err.line())
        .with_detail("column", err.column())
}

fn single_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    errors
}
