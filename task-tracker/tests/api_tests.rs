// tests/api_tests.rs
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

mod common;

use common::app_helper::{setup_app, setup_app_with_body_limit, setup_file_app};
use common::request::{empty_request, json_request, raw_request, send};
use common::test_data::{create_task, create_task_with_title, create_test_task, FAR_FUTURE};

fn ids(body: &Value) -> Vec<u64> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["environment"], "test");
}

#[tokio::test]
async fn test_create_task_endpoint() {
    let app = setup_app();

    let (status, body) = send(&app, json_request("POST", "/tasks", &create_test_task())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["message"], "Task created");
    assert_eq!(body["data"]["title"], "Write report");
    assert_eq!(body["data"]["deadline"], FAR_FUTURE);
    assert_eq!(body["data"]["completed"], false);
    assert!(body["data"]["createdAt"].is_string());

    let id = body["data"]["id"].as_u64().unwrap();
    assert_eq!(body["details"]["id"], id);
}

#[tokio::test]
async fn test_create_task_title_too_short() {
    let app = setup_app();

    let (status, body) =
        send(&app, json_request("POST", "/tasks", &create_task_with_title("ab"))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    let message = body["fieldErrors"]["title"].as_str().unwrap();
    assert!(message.contains('3') && message.contains("32"), "{}", message);
}

#[tokio::test]
async fn test_create_task_reports_every_violation() {
    let app = setup_app();

    let payload = json!({ "title": "", "deadline": "2000-01-01T00:00:00" });
    let (status, body) = send(&app, json_request("POST", "/tasks", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    assert!(body["fieldErrors"]["title"].is_string());
    assert_eq!(
        body["fieldErrors"]["deadline"],
        "Deadline must be in present or in future"
    );
}

#[tokio::test]
async fn test_create_task_missing_title() {
    let app = setup_app();

    let (status, body) = send(&app, json_request("POST", "/tasks", &json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fieldErrors"]["title"], "Title must not be empty");
}

#[tokio::test]
async fn test_create_task_unknown_property() {
    let app = setup_app();

    let payload = json!({ "title": "Write report", "priority": "high" });
    let (status, body) = send(&app, json_request("POST", "/tasks", &payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "UNKNOWN_PROPERTY");
    assert_eq!(body["fieldErrors"]["priority"], "Unexpected field");
}

#[tokio::test]
async fn test_create_task_malformed_json() {
    let app = setup_app();

    let (status, body) = send(&app, raw_request("POST", "/tasks", r#"{"title": "Write"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "JSON_PARSE_ERROR");
    assert!(body["details"]["line"].is_number());
}

#[tokio::test]
async fn test_create_task_wrong_type() {
    let app = setup_app();

    let (status, body) = send(&app, json_request("POST", "/tasks", &json!({ "title": 5 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    assert_eq!(body["fieldErrors"]["title"], "Expected string but got number");
}

#[tokio::test]
async fn test_create_task_body_too_large() {
    let app = setup_app_with_body_limit(32);

    let payload = create_task_with_title(&"x".repeat(64));
    let (status, body) = send(&app, json_request("POST", "/tasks", &payload)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["errorCode"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn test_get_task_endpoint() {
    let app = setup_app();
    let id = create_task(&app, "Write report").await;

    let (status, body) = send(&app, empty_request("GET", &format!("/tasks/{}", id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task found");
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["title"], "Write report");
}

#[tokio::test]
async fn test_get_unknown_task() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/tasks/999999")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["errorCode"], "TASK_NOT_FOUND");
    assert_eq!(body["details"], json!({ "id": 999999 }));
}

#[tokio::test]
async fn test_invalid_task_id() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/tasks/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "VALIDATION_FAILED");
    assert_eq!(body["fieldErrors"]["id"], "Expected integer but got \"abc\"");

    let (status, body) = send(&app, empty_request("GET", "/tasks/-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fieldErrors"]["id"], "Task id must be zero or positive");
}

#[tokio::test]
async fn test_complete_task_twice() {
    let app = setup_app();
    let id = create_task(&app, "Write report").await;
    let uri = format!("/tasks/{}", id);

    let (status, body) = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Task completed");
    assert_eq!(body["data"]["completed"], true);

    let (status, body) = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task already completed");
    assert_eq!(body["data"]["completed"], true);
    assert_eq!(body["data"]["id"], id);
    assert_eq!(body["data"]["title"], "Write report");
}

#[tokio::test]
async fn test_complete_unknown_task() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("PATCH", "/tasks/42")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "TASK_NOT_FOUND");
}

#[tokio::test]
async fn test_delete_task_endpoint() {
    let app = setup_app();
    let id = create_task(&app, "Write report").await;
    let uri = format!("/tasks/{}", id);

    let (status, body) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Task deleted");
    assert_eq!(body["data"]["id"], id);

    let (status, _) = send(&app, empty_request("GET", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["id"], id);
}

#[tokio::test]
async fn test_list_and_filter_tasks() {
    let app = setup_app();
    let first = create_task(&app, "First task").await;
    let second = create_task(&app, "Second task").await;
    let third = create_task(&app, "Third task").await;
    send(&app, empty_request("PATCH", &format!("/tasks/{}", second))).await;

    let (status, body) = send(&app, empty_request("GET", "/tasks")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![first, second, third]);
    assert_eq!(body["details"]["count"], 3);

    let (_, body) = send(&app, empty_request("GET", "/tasks/completed")).await;
    assert_eq!(ids(&body), vec![second]);

    let (_, body) = send(&app, empty_request("GET", "/tasks/incomplete")).await;
    assert_eq!(ids(&body), vec![first, third]);

    let (_, body) = send(&app, empty_request("GET", "/tasks?completed=true")).await;
    assert_eq!(ids(&body), vec![second]);
    assert_eq!(body["details"]["completed"], true);
}

#[tokio::test]
async fn test_list_invalid_query() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/tasks?completed=maybe")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorCode"], "INVALID_QUERY_PARAMETERS");
    assert!(body["fieldErrors"]["completed"].is_string());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = setup_app();

    let (status, body) = send(&app, empty_request("GET", "/projects")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["errorCode"], "RESOURCE_NOT_FOUND");
    assert_eq!(body["details"]["path"], "/projects");
}

#[tokio::test]
async fn test_request_id_header() {
    let app = setup_app();

    let res = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    let request_id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_file_backed_app_persists() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let app = setup_file_app(dir.path()).await;
        create_task(&app, "Write report").await
    };
    assert!(dir.path().join("tasks").join(format!("{}.json", id)).exists());

    // 再起動しても残っている
    let app = setup_file_app(dir.path()).await;
    let (status, body) = send(&app, empty_request("GET", &format!("/tasks/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Write report");

    let next = create_task(&app, "Next task").await;
    assert!(next > id);
}
