// tests/common/test_data.rs

use axum::Router;
use serde_json::{json, Value};

use super::request::{json_request, send};

pub const FAR_FUTURE: &str = "2099-01-01T00:00:00";

/// テスト用のタスク作成データを生成
pub fn create_test_task() -> Value {
    json!({ "title": "Write report", "deadline": FAR_FUTURE })
}

/// タイトルだけのタスク作成データを生成
pub fn create_task_with_title(title: &str) -> Value {
    json!({ "title": title })
}

/// タスクを作成して id を返す
pub async fn create_task(app: &Router, title: &str) -> u64 {
    let (status, body) = send(app, json_request("POST", "/tasks", &create_task_with_title(title))).await;
    assert_eq!(status.as_u16(), 201, "unexpected response: {}", body);
    body["data"]["id"].as_u64().unwrap()
}
