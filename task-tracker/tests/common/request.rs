// tests/common/request.rs
use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

/// JSON ボディ付きのリクエストを作成
pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    raw_request(method, uri, serde_json::to_string(body).unwrap())
}

/// 任意のボディ文字列でリクエストを作成（壊れた JSON の送信用）
pub fn raw_request(method: &str, uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

/// ボディなしのリクエストを作成
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::from_bytes(method.as_bytes()).unwrap())
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// レスポンスのステータスと JSON ボディを取り出す
pub async fn read_json(res: Response) -> (StatusCode, Value) {
    let status = res.status();
    let body = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&body).unwrap();
    (status, value)
}

/// リクエストを送ってステータスと JSON ボディを返す
pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    read_json(res).await
}
