use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::error::{Details, ErrorCode, FieldErrors};

/// エンベロープ構築時のプログラミングエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("SuccessEnvelope can only use success HTTP status codes (2xx), got {0}")]
    NotSuccessStatus(u16),

    #[error("ErrorEnvelope can only use error HTTP status codes (4xx or 5xx), got {0}")]
    NotErrorStatus(u16),

    #[error("Error code {code} is bound to status {expected}, got {actual}")]
    StatusMismatch {
        code: ErrorCode,
        expected: u16,
        actual: u16,
    },
}

fn serialize_status<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// 成功レスポンス
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SuccessEnvelope<T> {
    #[serde(serialize_with = "serialize_status")]
    status: StatusCode,
    message: String,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Details>,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: T) -> Result<Self, EnvelopeError> {
        if !status.is_success() {
            return Err(EnvelopeError::NotSuccessStatus(status.as_u16()));
        }

        Ok(Self {
            status,
            message: message.into(),
            data,
            details: None,
        })
    }

    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message: message.into(),
            data,
            details: None,
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message: message.into(),
            data,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details.get_or_insert_with(Details::new).extend(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }
}

impl<T: Serialize> IntoResponse for SuccessEnvelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// 統一的なエラーレスポンス構造
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    #[serde(serialize_with = "serialize_status")]
    status: StatusCode,
    error_code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Details>,
}

impl ErrorEnvelope {
    pub fn new(
        status: StatusCode,
        error_code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, EnvelopeError> {
        if !(status.is_client_error() || status.is_server_error()) {
            return Err(EnvelopeError::NotErrorStatus(status.as_u16()));
        }

        let expected = error_code.http_status();
        if status != expected {
            return Err(EnvelopeError::StatusMismatch {
                code: error_code,
                expected: expected.as_u16(),
                actual: status.as_u16(),
            });
        }

        Ok(Self::from_code(error_code, message))
    }

    /// ステータスはエラーコードから決まる
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status: error_code.http_status(),
            error_code,
            message: message.into(),
            field_errors: None,
            details: None,
        }
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors
            .get_or_insert_with(FieldErrors::new)
            .extend(field_errors);
        self
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details.get_or_insert_with(Details::new).extend(details);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn error_code(&self) -> ErrorCode {
        self.error_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        self.field_errors.as_ref()
    }

    pub fn details(&self) -> Option<&Details> {
        self.details.as_ref()
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
