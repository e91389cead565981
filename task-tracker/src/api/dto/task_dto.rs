// src/api/dto/task_dto.rs
use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::utils::validation::{common, BodyDto, BodyField, FieldKind, Param, ParamDto};

// --- Request DTOs ---

/// `POST /tasks`
#[derive(Deserialize, Debug, Clone, Validate)]
pub struct CreateTaskDto {
    #[validate(
        required(message = "Title must not be empty"),
        custom(function = validate_title_not_blank),
        length(
            min = common::task::TITLE_MIN_LENGTH,
            max = common::task::TITLE_MAX_LENGTH,
            message = "Title must be between 3 and 32 characters"
        )
    )]
    pub title: Option<String>,

    #[validate(custom(function = validate_deadline))]
    pub deadline: Option<NaiveDateTime>,
}

impl BodyDto for CreateTaskDto {
    fn fields() -> Vec<BodyField> {
        vec![
            BodyField::new("title", FieldKind::Text),
            BodyField::new("deadline", FieldKind::DateTime),
        ]
    }
}

impl CreateTaskDto {
    /// 検証済みのタイトル
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// `/tasks/{id}`
#[derive(Debug, Default, Clone, Validate)]
pub struct TaskIdPathDto {
    #[validate(
        required(message = "Task id must not be null"),
        range(min = 0, message = "Task id must be zero or positive")
    )]
    pub id: Option<i64>,
}

impl ParamDto for TaskIdPathDto {
    fn params() -> Vec<Param<Self>> {
        vec![Param::new("id", FieldKind::Integer, |dto, value| {
            dto.id = value.into_integer()
        })]
    }
}

impl TaskIdPathDto {
    pub fn task_id(&self) -> AppResult<u64> {
        self.id
            .and_then(|id| u64::try_from(id).ok())
            .ok_or_else(|| AppError::internal("Task id accessed before validation"))
    }
}

/// `GET /tasks?completed=true|false`
#[derive(Debug, Default, Clone, Validate)]
pub struct TaskListQuery {
    pub completed: Option<bool>,
}

impl ParamDto for TaskListQuery {
    fn params() -> Vec<Param<Self>> {
        vec![Param::new("completed", FieldKind::Boolean, |dto, value| {
            dto.completed = value.into_boolean()
        })]
    }
}

// --- Custom validators ---

fn validate_title_not_blank(title: &str) -> Result<(), ValidationError> {
    common::validate_not_blank(title).map_err(|mut error| {
        error.message = Some("Title must not be empty".into());
        error
    })
}

fn validate_deadline(deadline: &NaiveDateTime) -> Result<(), ValidationError> {
    common::validate_future_or_present(deadline).map_err(|mut error| {
        error.message = Some("Deadline must be in present or in future".into());
        error
    })
}
