// src/domain/task_model.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::datetime;

/// タスク
///
/// `id` と `created_at` は生成後に変更されない。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: u64,
    title: String,
    #[serde(default)]
    completed: bool,
    created_at: NaiveDateTime,
    #[serde(default)]
    deadline: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(
        id: u64,
        title: impl Into<String>,
        completed: bool,
        deadline: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
            created_at: datetime::now(),
            deadline,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.deadline
    }

    /// 完了にする。状態が変わった場合のみ true
    pub fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }
}

/// 作成用の入力（id はリポジトリが採番する）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub deadline: Option<NaiveDateTime>,
}

impl NewTask {
    pub fn into_task(self, id: u64) -> Task {
        Task::new(id, self.title, self.completed, self.deadline)
    }
}
