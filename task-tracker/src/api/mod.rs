// src/api/mod.rs
use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::repository::build_task_repository;
use crate::service::task_service::TaskService;
use crate::storage::StorageError;

pub mod dto;
pub mod handlers;

use handlers::system_handler::{fallback_handler, handle_panic, system_router};
use handlers::task_handler::task_router;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(task_service: Arc<TaskService>, config: Arc<AppConfig>) -> Self {
        Self {
            task_service,
            config,
        }
    }

    /// 設定からリポジトリ・サービスを組み立てる
    pub async fn from_config(config: AppConfig) -> Result<Self, StorageError> {
        let repo = build_task_repository(&config.storage).await?;
        let task_service = Arc::new(TaskService::new(repo));
        Ok(Self::new(task_service, Arc::new(config)))
    }
}

/// 全ルートとミドルウェアを組み立てる
pub fn app_router(app_state: AppState) -> Router {
    let body_limit = app_state.config.server.body_limit;

    Router::new()
        .merge(task_router(app_state.clone()))
        .merge(system_router(app_state))
        .fallback(fallback_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
        // 一番外側で panic を捕まえる
        .layer(CatchPanicLayer::custom(handle_panic))
}
