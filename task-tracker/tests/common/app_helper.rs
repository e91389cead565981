// tests/common/app_helper.rs

use axum::Router;
use std::path::Path;
use std::sync::Arc;
use task_tracker::{
    api::{app_router, AppState},
    config::{AppConfig, StorageBackend},
    repository::{FileTaskRepository, InMemoryTaskRepository},
    service::task_service::TaskService,
};

use crate::common;

/// メモリ上のリポジトリでアプリをセットアップ
pub fn setup_app() -> Router {
    common::init_test_env();

    let service = Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())));
    let app_state = AppState::new(service, Arc::new(AppConfig::for_testing()));
    app_router(app_state)
}

/// ボディ上限を指定してセットアップ
pub fn setup_app_with_body_limit(body_limit: usize) -> Router {
    common::init_test_env();

    let mut config = AppConfig::for_testing();
    config.server.body_limit = body_limit;

    let service = Arc::new(TaskService::new(Arc::new(InMemoryTaskRepository::new())));
    app_router(AppState::new(service, Arc::new(config)))
}

/// ファイルベースのリポジトリでアプリをセットアップ
pub async fn setup_file_app(data_dir: &Path) -> Router {
    common::init_test_env();

    let mut config = AppConfig::for_testing();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = data_dir.to_path_buf();

    let app_state = AppState::from_config(config).await.unwrap();
    app_router(app_state)
}

/// ファイルベースのサービス（ルーターを通さないテスト用）
pub async fn setup_file_service(data_dir: &Path) -> TaskService {
    common::init_test_env();

    let repo = FileTaskRepository::open(data_dir).await.unwrap();
    TaskService::new(Arc::new(repo))
}
