// src/storage/task_file_storage.rs
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use super::{write_json_atomic, StorageError};
use crate::domain::task_model::Task;

/// タスク1件 = `{id}.json` 1ファイル
pub struct TaskFileStorage {
    dir: PathBuf,
}

impl TaskFileStorage {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::io(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    /// 全タスクを読み込む。読めないファイルはログに残してスキップする
    pub async fn load_all(&self) -> Result<Vec<Task>, StorageError> {
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?;

        let mut tasks = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            match read_task(&path).await {
                Ok(Some(task)) => tasks.push(task),
                // 列挙と読み込みの間に削除された
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        module = "storage",
                        path = %path.display(),
                        error = %err,
                        "Skipping unreadable task file"
                    );
                }
            }
        }

        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }

    pub async fn load(&self, id: u64) -> Result<Option<Task>, StorageError> {
        read_task(&self.path_for(id)).await
    }

    pub async fn save(&self, task: &Task) -> Result<(), StorageError> {
        write_json_atomic(&self.path_for(task.id()), task).await
    }

    /// ファイルを削除する。存在しなかった場合は false
    pub async fn delete(&self, id: u64) -> Result<bool, StorageError> {
        let path = self.path_for(id);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&path, e)),
        }
    }
}

async fn read_task(path: &Path) -> Result<Option<Task>, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::serialization(path, e))
}
