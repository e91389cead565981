// src/api/handlers/system_handler.rs
use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::any::Any;
use tracing::error;

use crate::api::AppState;
use crate::error::{internal_error_envelope, AppError, ErrorCode};
use crate::types::SuccessEnvelope;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub environment: String,
}

pub async fn health_check_handler(
    State(app_state): State<AppState>,
) -> SuccessEnvelope<HealthResponse> {
    SuccessEnvelope::ok(
        "Service is healthy",
        HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            environment: app_state.config.environment.to_string(),
        },
    )
}

/// どのルートにも一致しなかった
pub async fn fallback_handler(uri: Uri) -> AppError {
    AppError::new(ErrorCode::ResourceNotFound, "Resource not found").with_detail("path", uri.path())
}

/// ハンドラー内の panic を 500 のエンベロープに変換する（CatchPanicLayer 用）
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic message".to_string()
    };

    error!(module = "error_handler", panic = %detail, "Handler panicked");
    internal_error_envelope("panic").into_response()
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check_handler))
        .with_state(app_state)
}
