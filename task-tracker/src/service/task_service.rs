// src/service/task_service.rs

use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::task_model::{NewTask, Task};
use crate::error::AppResult;
use crate::repository::{Completion, TaskRepository};
use crate::types::ServiceResult;

/// タスクのユースケース
///
/// 処理結果は `ServiceResult` で返し、HTTP ステータスの判断はハンドラーに任せる。
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    // --- 参照 ---
    pub async fn list_tasks(&self) -> AppResult<ServiceResult<Vec<Task>>> {
        let mut tasks = self.repo.find_all().await?;
        tasks.sort_by_key(Task::id);

        debug!(module = "service", count = tasks.len(), "Listed tasks");
        Ok(ServiceResult::found(tasks))
    }

    pub async fn list_tasks_by_completion(
        &self,
        completed: bool,
    ) -> AppResult<ServiceResult<Vec<Task>>> {
        let mut tasks = self.repo.find_by_completion(completed).await?;
        tasks.sort_by_key(Task::id);

        debug!(
            module = "service",
            completed,
            count = tasks.len(),
            "Listed tasks by completion"
        );
        Ok(ServiceResult::found(tasks))
    }

    /// 見つからない場合は `None`（404 にするかはハンドラーが決める）
    pub async fn get_task(&self, id: u64) -> AppResult<Option<ServiceResult<Task>>> {
        let task = self.repo.find_by_id(id).await?;
        debug!(module = "service", task_id = id, found = task.is_some(), "Fetched task");
        Ok(task.map(ServiceResult::found))
    }

    // --- 更新 ---
    pub async fn create_task(
        &self,
        title: impl Into<String>,
        completed: bool,
        deadline: Option<NaiveDateTime>,
    ) -> AppResult<ServiceResult<Task>> {
        let task = self
            .repo
            .create(NewTask {
                title: title.into(),
                completed,
                deadline,
            })
            .await?;

        info!(module = "service", task_id = task.id(), "Task created");
        Ok(ServiceResult::created(task))
    }

    /// 完了済みなら `Nothing`、今回完了したなら `Updated`
    pub async fn complete_task(&self, id: u64) -> AppResult<Option<ServiceResult<Task>>> {
        let result = match self.repo.complete(id).await? {
            None => None,
            Some(Completion::AlreadyCompleted(task)) => {
                debug!(module = "service", task_id = id, "Task was already completed");
                Some(ServiceResult::nothing(task))
            }
            Some(Completion::Completed(task)) => {
                info!(module = "service", task_id = id, "Task completed");
                Some(ServiceResult::updated(task))
            }
        };
        Ok(result)
    }

    pub async fn delete_task(&self, id: u64) -> AppResult<Option<ServiceResult<Task>>> {
        let deleted = self.repo.delete(id).await?;
        if deleted.is_some() {
            info!(module = "service", task_id = id, "Task deleted");
        }
        Ok(deleted.map(ServiceResult::deleted))
    }
}
