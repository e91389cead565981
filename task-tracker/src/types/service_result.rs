use serde::Serialize;

/// サービス処理の結果種別
///
/// ハンドラーはこれを見てステータスコードとメッセージを決める。
/// ペイロードの中身から再判定しない。
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceProcess {
    Found,
    Created,
    Updated,
    Deleted,
    /// 何も変更しなかった（例: 既に完了済みのタスク）
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResult<T> {
    pub process: ServiceProcess,
    pub data: T,
}

impl<T> ServiceResult<T> {
    pub fn new(process: ServiceProcess, data: T) -> Self {
        Self { process, data }
    }

    pub fn found(data: T) -> Self {
        Self::new(ServiceProcess::Found, data)
    }

    pub fn created(data: T) -> Self {
        Self::new(ServiceProcess::Created, data)
    }

    pub fn updated(data: T) -> Self {
        Self::new(ServiceProcess::Updated, data)
    }

    pub fn deleted(data: T) -> Self {
        Self::new(ServiceProcess::Deleted, data)
    }

    pub fn nothing(data: T) -> Self {
        Self::new(ServiceProcess::Nothing, data)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ServiceResult<U> {
        ServiceResult {
            process: self.process,
            data: f(self.data),
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}
