// src/repository/task_repository.rs
use async_trait::async_trait;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::info;

use crate::domain::task_model::{NewTask, Task};
use crate::storage::{SettingsStorage, StorageError, TaskFileStorage};

/// 完了操作の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// 既に完了済み（何も書き込んでいない）
    AlreadyCompleted(Task),
    /// 今回の操作で完了になった
    Completed(Task),
}

/// タスクの永続化を抽象化する。HTTP については何も知らない
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Task>, StorageError>;

    async fn find_by_completion(&self, completed: bool) -> Result<Vec<Task>, StorageError> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|task| task.is_completed() == completed)
            .collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Task>, StorageError>;

    /// ID を採番して保存する
    async fn create(&self, new_task: NewTask) -> Result<Task, StorageError>;

    async fn save(&self, task: &Task) -> Result<(), StorageError>;

    /// 読み込み・判定・書き込みを1つの書き込みロック内で行う
    async fn complete(&self, id: u64) -> Result<Option<Completion>, StorageError>;

    async fn delete(&self, id: u64) -> Result<Option<Task>, StorageError>;
}

/// ファイルベースのリポジトリ
///
/// 書き込み系の操作は `write_lock` で直列化する。
pub struct FileTaskRepository {
    tasks: TaskFileStorage,
    settings: SettingsStorage,
    write_lock: Mutex<()>,
}

impl FileTaskRepository {
    /// `<data_dir>/tasks/` と `<data_dir>/settings.json` を開く
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref();
        let tasks = TaskFileStorage::open(data_dir.join("tasks")).await?;
        let settings = SettingsStorage::load(data_dir.join("settings.json")).await?;

        // 一度払い出した ID は二度と使わない
        let max_id = tasks
            .load_all()
            .await?
            .iter()
            .map(Task::id)
            .max()
            .unwrap_or(0);
        settings.ensure_at_least(max_id).await?;

        let last_id = settings.last_id().await;
        info!(
            module = "repository",
            data_dir = %data_dir.display(),
            last_id,
            "File task repository opened"
        );

        Ok(Self {
            tasks,
            settings,
            write_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl TaskRepository for FileTaskRepository {
    async fn find_all(&self) -> Result<Vec<Task>, StorageError> {
        self.tasks.load_all().await
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Task>, StorageError> {
        self.tasks.load(id).await
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, StorageError> {
        let _guard = self.write_lock.lock().await;

        let id = self.settings.allocate_id().await?;
        let task = new_task.into_task(id);
        self.tasks.save(&task).await?;
        Ok(task)
    }

    async fn save(&self, task: &Task) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.tasks.save(task).await
    }

    async fn complete(&self, id: u64) -> Result<Option<Completion>, StorageError> {
        let _guard = self.write_lock.lock().await;

        let Some(mut task) = self.tasks.load(id).await? else {
            return Ok(None);
        };
        if !task.mark_completed() {
            return Ok(Some(Completion::AlreadyCompleted(task)));
        }
        self.tasks.save(&task).await?;
        Ok(Some(Completion::Completed(task)))
    }

    async fn delete(&self, id: u64) -> Result<Option<Task>, StorageError> {
        let _guard = self.write_lock.lock().await;

        let Some(task) = self.tasks.load(id).await? else {
            return Ok(None);
        };
        self.tasks.delete(id).await?;
        Ok(Some(task))
    }
}
