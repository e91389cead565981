// src/api/handlers/task_handler.rs
use axum::{extract::State, routing::get, Router};
use serde_json::Value;
use tracing::info;

use crate::api::dto::task_dto::{CreateTaskDto, TaskIdPathDto, TaskListQuery};
use crate::api::AppState;
use crate::domain::task_model::Task;
use crate::error::{AppError, AppResult, Details};
use crate::extractors::{ValidatedBody, ValidatedPath, ValidatedQuery};
use crate::types::{ServiceProcess, ServiceResult, SuccessEnvelope};

// --- Response helpers ---

/// 処理結果の種別からステータスとメッセージを決める
fn task_envelope(result: ServiceResult<Task>) -> SuccessEnvelope<Task> {
    let id = result.data.id();
    let envelope = match result.process {
        ServiceProcess::Found => SuccessEnvelope::ok("Task found", result.data),
        ServiceProcess::Created => SuccessEnvelope::created("Task created", result.data),
        // 状態が変わった場合のみ 201
        ServiceProcess::Updated => SuccessEnvelope::created("Task completed", result.data),
        ServiceProcess::Nothing => SuccessEnvelope::ok("Task already completed", result.data),
        ServiceProcess::Deleted => SuccessEnvelope::ok("Task deleted", result.data),
    };

    let mut details = Details::new();
    details.insert("id".to_string(), Value::from(id));
    envelope.with_details(details)
}

fn tasks_envelope(
    result: ServiceResult<Vec<Task>>,
    completed: Option<bool>,
) -> SuccessEnvelope<Vec<Task>> {
    let mut details = Details::new();
    details.insert("count".to_string(), Value::from(result.data.len()));
    if let Some(completed) = completed {
        details.insert("completed".to_string(), Value::from(completed));
    }

    SuccessEnvelope::ok("Tasks found", result.into_data()).with_details(details)
}

async fn list_by_completion(
    app_state: &AppState,
    completed: bool,
) -> AppResult<SuccessEnvelope<Vec<Task>>> {
    let result = app_state
        .task_service
        .list_tasks_by_completion(completed)
        .await?;
    Ok(tasks_envelope(result, Some(completed)))
}

// --- Handlers ---

pub async fn list_tasks_handler(
    State(app_state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TaskListQuery>,
) -> AppResult<SuccessEnvelope<Vec<Task>>> {
    match query.completed {
        Some(completed) => list_by_completion(&app_state, completed).await,
        None => {
            let result = app_state.task_service.list_tasks().await?;
            Ok(tasks_envelope(result, None))
        }
    }
}

pub async fn list_completed_tasks_handler(
    State(app_state): State<AppState>,
) -> AppResult<SuccessEnvelope<Vec<Task>>> {
    list_by_completion(&app_state, true).await
}

pub async fn list_incomplete_tasks_handler(
    State(app_state): State<AppState>,
) -> AppResult<SuccessEnvelope<Vec<Task>>> {
    list_by_completion(&app_state, false).await
}

pub async fn get_task_handler(
    State(app_state): State<AppState>,
    ValidatedPath(path): ValidatedPath<TaskIdPathDto>,
) -> AppResult<SuccessEnvelope<Task>> {
    let id = path.task_id()?;
    let result = app_state
        .task_service
        .get_task(id)
        .await?
        .ok_or_else(|| AppError::task_not_found(id))?;

    Ok(task_envelope(result))
}

pub async fn create_task_handler(
    State(app_state): State<AppState>,
    ValidatedBody(payload): ValidatedBody<CreateTaskDto>,
) -> AppResult<SuccessEnvelope<Task>> {
    // 作成時は常に未完了
    let result = app_state
        .task_service
        .create_task(payload.title(), false, payload.deadline)
        .await?;

    info!(task_id = result.data.id(), "Task created via API");
    Ok(task_envelope(result))
}

pub async fn complete_task_handler(
    State(app_state): State<AppState>,
    ValidatedPath(path): ValidatedPath<TaskIdPathDto>,
) -> AppResult<SuccessEnvelope<Task>> {
    let id = path.task_id()?;
    let result = app_state
        .task_service
        .complete_task(id)
        .await?
        .ok_or_else(|| AppError::task_not_found(id))?;

    Ok(task_envelope(result))
}

pub async fn delete_task_handler(
    State(app_state): State<AppState>,
    ValidatedPath(path): ValidatedPath<TaskIdPathDto>,
) -> AppResult<SuccessEnvelope<Task>> {
    let id = path.task_id()?;
    let result = app_state
        .task_service
        .delete_task(id)
        .await?
        .ok_or_else(|| AppError::task_not_found(id))?;

    Ok(task_envelope(result))
}

// --- Router Setup ---

pub fn task_router(app_state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks_handler).post(create_task_handler))
        .route("/tasks/completed", get(list_completed_tasks_handler))
        .route("/tasks/incomplete", get(list_incomplete_tasks_handler))
        .route(
            "/tasks/{id}",
            get(get_task_handler)
                .patch(complete_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(app_state)
}
