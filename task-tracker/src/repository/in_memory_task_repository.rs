// src/repository/in_memory_task_repository.rs
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::task_repository::{Completion, TaskRepository};
use crate::domain::task_model::{NewTask, Task};
use crate::storage::StorageError;

#[derive(Default)]
struct InMemoryState {
    tasks: BTreeMap<u64, Task>,
    last_id: u64,
}

/// メモリ上のリポジトリ（テスト・`STORAGE_BACKEND=memory` 用）
#[derive(Default)]
pub struct InMemoryTaskRepository {
    state: RwLock<InMemoryState>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>, StorageError> {
        Ok(self.state.read().await.tasks.values().cloned().collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Task>, StorageError> {
        Ok(self.state.read().await.tasks.get(&id).cloned())
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, StorageError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let task = new_task.into_task(state.last_id);
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<(), StorageError> {
        let mut state = self.state.write().await;
        state.last_id = state.last_id.max(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn complete(&self, id: u64) -> Result<Option<Completion>, StorageError> {
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if task.mark_completed() {
            Ok(Some(Completion::Completed(task.clone())))
        } else {
            Ok(Some(Completion::AlreadyCompleted(task.clone())))
        }
    }

    async fn delete(&self, id: u64) -> Result<Option<Task>, StorageError> {
        Ok(self.state.write().await.tasks.remove(&id))
    }
}
