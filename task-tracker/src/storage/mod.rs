// src/storage/mod.rs

//! ファイルシステム上の JSON ストレージ
//!
//! - `tasks/{id}.json` : タスク1件につき1ファイル
//! - `settings.json`   : `{"lastId": n}` 採番カウンタ

pub mod settings_storage;
pub mod task_file_storage;

pub use settings_storage::{SettingsStorage, SystemSettings};
pub use task_file_storage::TaskFileStorage;

use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        StorageError::Serialization {
            path: path.into(),
            source,
        }
    }

    /// クライアントに返してよい種別名
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::Io { .. } => "StorageIoError",
            StorageError::Serialization { .. } => "StorageSerializationError",
        }
    }
}

/// 一時ファイルに書いてから rename する。書き込み途中のファイルを読ませない
pub(crate) async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let bytes =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::serialization(path, e))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &bytes)
        .await
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path)
        .await
        .map_err(|e| StorageError::io(path, e))?;

    Ok(())
}
