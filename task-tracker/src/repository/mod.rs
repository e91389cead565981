// src/repository/mod.rs
pub mod in_memory_task_repository;
pub mod task_repository;

pub use in_memory_task_repository::InMemoryTaskRepository;
pub use task_repository::{Completion, FileTaskRepository, TaskRepository};

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::storage::StorageError;

/// 設定に応じたリポジトリを作る
pub async fn build_task_repository(
    config: &StorageConfig,
) -> Result<Arc<dyn TaskRepository>, StorageError> {
    let repo: Arc<dyn TaskRepository> = match config.backend {
        StorageBackend::File => Arc::new(FileTaskRepository::open(&config.data_dir).await?),
        StorageBackend::Memory => Arc::new(InMemoryTaskRepository::new()),
    };
    Ok(repo)
}
