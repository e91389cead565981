// src/storage/settings_storage.rs
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{write_json_atomic, StorageError};

/// システム設定ファイルの中身
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    /// 最後に払い出したタスク ID（減ることはない）
    #[serde(default)]
    pub last_id: u64,
}

/// 採番カウンタを保持する設定ストレージ
///
/// 払い出しのたびにファイルへ書き戻す。書き込みに失敗した場合は
/// メモリ上のカウンタも進めない。
pub struct SettingsStorage {
    path: PathBuf,
    settings: Mutex<SystemSettings>,
}

impl SettingsStorage {
    /// 設定を読み込む。ファイルがなければ `lastId: 0` で作成する
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let settings = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
                // 空ファイルは初期状態とみなす
                let settings = SystemSettings::default();
                write_json_atomic(&path, &settings).await?;
                settings
            }
            Ok(bytes) => serde_json::from_slice::<SystemSettings>(&bytes)
                .map_err(|e| StorageError::serialization(&path, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StorageError::io(parent, e))?;
                }
                let settings = SystemSettings::default();
                write_json_atomic(&path, &settings).await?;
                info!(module = "storage", path = %path.display(), "Created settings file");
                settings
            }
            Err(e) => return Err(StorageError::io(&path, e)),
        };

        debug!(module = "storage", last_id = settings.last_id, "Settings loaded");

        Ok(Self {
            path,
            settings: Mutex::new(settings),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn last_id(&self) -> u64 {
        self.settings.lock().await.last_id
    }

    /// 次の ID を払い出して永続化する
    pub async fn allocate_id(&self) -> Result<u64, StorageError> {
        let mut settings = self.settings.lock().await;
        let next = SystemSettings {
            last_id: settings.last_id + 1,
        };
        write_json_atomic(&self.path, &next).await?;
        *settings = next;
        Ok(next.last_id)
    }

    /// 既存データより小さいカウンタを引き上げる（設定ファイルだけ失われた場合など）
    pub async fn ensure_at_least(&self, id: u64) -> Result<(), StorageError> {
        let mut settings = self.settings.lock().await;
        if settings.last_id >= id {
            return Ok(());
        }
        let raised = SystemSettings { last_id: id };
        write_json_atomic(&self.path, &raised).await?;
        info!(
            module = "storage",
            from = settings.last_id,
            to = id,
            "Raised id counter to match stored tasks"
        );
        *settings = raised;
        Ok(())
    }
}
