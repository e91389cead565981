// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::storage::StorageError;
use crate::types::response::ErrorEnvelope;

/// フィールド名 → エラーメッセージ
pub type FieldErrors = BTreeMap<String, String>;

/// クライアント向けの機械可読な補足情報（例: `{"id": 42}`）
pub type Details = Map<String, Value>;

/// エラーコード
///
/// 各コードはちょうど1つの HTTP ステータスに固定で紐づきます。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // --- 400 BAD REQUEST ---
    UnknownProperty,
    ValidationFailed,
    JsonParseError,
    JsonMappingError,
    InvalidQueryParameters,

    // --- 401 UNAUTHORIZED ---
    Unauthorized,
    TokenExpired,
    TokenInvalid,

    // --- 403 FORBIDDEN ---
    AccessDenied,
    RoleRequired,

    // --- 404 NOT FOUND ---
    UserNotFound,
    TaskNotFound,
    ResourceNotFound,

    // --- 409 CONFLICT ---
    UserAlreadyExists,
    DuplicateEmail,
    UsernameAlreadyTaken,

    // --- 413 PAYLOAD TOO LARGE ---
    PayloadTooLarge,

    // --- 422 UNPROCESSABLE ENTITY ---
    BusinessRuleViolation,

    // --- 500 INTERNAL SERVER ERROR ---
    InternalError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 19] = [
        ErrorCode::UnknownProperty,
        ErrorCode::ValidationFailed,
        ErrorCode::JsonParseError,
        ErrorCode::JsonMappingError,
        ErrorCode::InvalidQueryParameters,
        ErrorCode::Unauthorized,
        ErrorCode::TokenExpired,
        ErrorCode::TokenInvalid,
        ErrorCode::AccessDenied,
        ErrorCode::RoleRequired,
        ErrorCode::UserNotFound,
        ErrorCode::TaskNotFound,
        ErrorCode::ResourceNotFound,
        ErrorCode::UserAlreadyExists,
        ErrorCode::DuplicateEmail,
        ErrorCode::UsernameAlreadyTaken,
        ErrorCode::PayloadTooLarge,
        ErrorCode::BusinessRuleViolation,
        ErrorCode::InternalError,
    ];

    pub const fn http_status(self) -> StatusCode {
        match self {
            ErrorCode::UnknownProperty
            | ErrorCode::ValidationFailed
            | ErrorCode::JsonParseError
            | ErrorCode::JsonMappingError
            | ErrorCode::InvalidQueryParameters => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized | ErrorCode::TokenExpired | ErrorCode::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            ErrorCode::AccessDenied | ErrorCode::RoleRequired => StatusCode::FORBIDDEN,
            ErrorCode::UserNotFound | ErrorCode::TaskNotFound | ErrorCode::ResourceNotFound => {
                StatusCode::NOT_FOUND
            }
            ErrorCode::UserAlreadyExists
            | ErrorCode::DuplicateEmail
            | ErrorCode::UsernameAlreadyTaken => StatusCode::CONFLICT,
            ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::BusinessRuleViolation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnknownProperty => "UNKNOWN_PROPERTY",
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::JsonParseError => "JSON_PARSE_ERROR",
            ErrorCode::JsonMappingError => "JSON_MAPPING_ERROR",
            ErrorCode::InvalidQueryParameters => "INVALID_QUERY_PARAMETERS",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::AccessDenied => "ACCESS_DENIED",
            ErrorCode::RoleRequired => "ROLE_REQUIRED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::TaskNotFound => "TASK_NOT_FOUND",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::UserAlreadyExists => "USER_ALREADY_EXISTS",
            ErrorCode::DuplicateEmail => "DUPLICATE_EMAIL",
            ErrorCode::UsernameAlreadyTaken => "USERNAME_ALREADY_TAKEN",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::BusinessRuleViolation => "BUSINESS_RULE_VIOLATION",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// エラーコード付きのクライアント向けエラー
    #[error("{code}: {message}")]
    Api {
        code: ErrorCode,
        message: String,
        field_errors: Option<FieldErrors>,
        details: Option<Details>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError::Api {
            code,
            message: message.into(),
            field_errors: None,
            details: None,
        }
    }

    pub fn validation_failed(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_field_errors(errors)
    }

    pub fn task_not_found(id: u64) -> Self {
        Self::new(ErrorCode::TaskNotFound, "Task with this id not found").with_detail("id", id)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }

    /// フィールドエラーを付与（コード付きエラー以外では何もしない）
    pub fn with_field_errors(mut self, errors: FieldErrors) -> Self {
        if let AppError::Api { field_errors, .. } = &mut self {
            field_errors.get_or_insert_with(FieldErrors::new).extend(errors);
        }
        self
    }

    pub fn with_details(mut self, extra: Details) -> Self {
        if let AppError::Api { details, .. } = &mut self {
            details.get_or_insert_with(Details::new).extend(extra);
        }
        self
    }

    pub fn with_detail(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut extra = Details::new();
        extra.insert(key.into(), value.into());
        self.with_details(extra)
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Api { code, .. } => *code,
            AppError::Storage(_) | AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code().http_status()
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Api { field_errors, .. } => field_errors.as_ref(),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&Details> {
        match self {
            AppError::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

// validator の集約結果をそのまま VALIDATION_FAILED に変換
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::validation_failed("Validation failed", collect_field_errors(&errors))
    }
}

/// ValidationErrors をフィールド → メッセージのマップに畳み込む
///
/// 1つのフィールドに複数の違反がある場合は `"; "` で連結します。
pub fn collect_field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let message = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), |m| m.to_string())
                })
                .collect::<Vec<_>>()
                .join("; ");
            (field.to_string(), message)
        })
        .collect()
}

/// 想定外の障害用のレスポンス。内部の詳細は種別名以外クライアントに出さない
pub fn internal_error_envelope(exception: &str) -> ErrorEnvelope {
    let mut details = Details::new();
    details.insert("exception".to_string(), Value::from(exception));
    ErrorEnvelope::from_code(
        ErrorCode::InternalError,
        "Something went wrong on the server",
    )
    .with_details(details)
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope = match self {
            AppError::Api {
                code,
                message,
                field_errors,
                details,
            } => {
                if code.http_status().is_server_error() {
                    error!(error_code = %code, error_message = %message, details = ?details, "Request failed");
                } else {
                    warn!(
                        error_code = %code,
                        error_message = %message,
                        field_errors = ?field_errors,
                        "Request rejected"
                    );
                }

                let mut envelope = ErrorEnvelope::from_code(code, message);
                if let Some(field_errors) = field_errors {
                    envelope = envelope.with_field_errors(field_errors);
                }
                if let Some(details) = details {
                    envelope = envelope.with_details(details);
                }
                envelope
            }
            AppError::Storage(err) => {
                // サーバーログには詳細を出す
                error!(module = "error_handler", error = ?err, kind = err.kind(), "Storage failure");
                internal_error_envelope(err.kind())
            }
            AppError::Internal(message) => {
                error!(module = "error_handler", error_message = %message, "Internal server error");
                internal_error_envelope("InternalError")
            }
        };

        envelope.into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;
