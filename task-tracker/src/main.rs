// src/main.rs
use tokio::net::TcpListener;
use tracing::info;

use task_tracker::config::AppConfig;
use task_tracker::logging::init_tracing;
use task_tracker::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 設定を読み込む
    let app_config = AppConfig::from_env()?;

    // トレーシングの設定
    init_tracing(app_config.environment);
    info!("Starting task tracker server...");
    info!(
        environment = %app_config.environment,
        storage = ?app_config.storage.backend,
        data_dir = %app_config.storage.data_dir.display(),
        "Configuration loaded"
    );

    let addr = app_config.socket_addr()?;

    // リポジトリ・サービスを一度だけ組み立てて共有する
    let app_state = AppState::from_config(app_config).await?;
    let app = app_router(app_state);

    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // シグナルを受け取れない場合は停止しない
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
