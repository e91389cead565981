// src/config.rs
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_BODY_LIMIT: usize = 1024 * 1024; // 1MB

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid {key} value: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Invalid server address {0}")]
    InvalidAddress(String),
}

/// 実行環境
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Debug,
    Test,
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "debug" => Ok(Environment::Debug),
            "test" => Ok(Environment::Test),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Debug => "debug",
            Environment::Test => "test",
        })
    }
}

/// 永続化の方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// リクエストボディの上限（バイト）
    pub body_limit: usize,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// `tasks/` と `settings.json` を置くディレクトリ
    pub data_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // .env ファイルを読み込む (存在しなくてもエラーにしない)
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 任意のキー → 値の参照元から設定を組み立てる
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            environment: parse_or(&lookup, "ENVIRONMENT", Environment::Development)?,
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
                port: parse_or(&lookup, "PORT", 7070)?,
                body_limit: parse_or(&lookup, "BODY_LIMIT", DEFAULT_BODY_LIMIT)?,
            },
            storage: StorageConfig {
                backend: parse_or(&lookup, "STORAGE_BACKEND", StorageBackend::File)?,
                data_dir: lookup("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("data")),
            },
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_debug(&self) -> bool {
        self.environment == Environment::Debug
    }

    pub fn is_test(&self) -> bool {
        self.environment == Environment::Test
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|_| ConfigError::InvalidAddress(addr))
    }

    /// テスト用の設定を作成（メモリ上のストレージ）
    pub fn for_testing() -> Self {
        Self {
            environment: Environment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                body_limit: DEFAULT_BODY_LIMIT,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                data_dir: PathBuf::from("data"),
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
