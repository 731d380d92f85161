#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use roster_db::{open_roster_db, DbPool, DbRuntimeSettings};
use roster_server::{app, AppState};
use roster_students::SqliteStudentStore;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router over a fresh file-backed database. Keep the `TempDir` alive for
/// the duration of the test.
pub fn setup_app() -> (Router, DbPool, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.db");
    let pool = open_roster_db(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();

    let state = AppState::new(SqliteStudentStore::new(pool.clone()));
    (app(state), pool, dir)
}

/// Sends one request and decodes the JSON response body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(json) => send_raw(app, method, uri, Some("application/json"), &json.to_string()).await,
        None => send_raw(app, method, uri, None, "").await,
    }
}

/// Sends `body` verbatim, with a `content-type` header only if one is given.
pub async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Creates a student through the API and returns the response body.
pub async fn create(app: &Router, name: &str, email: &str, age: i64) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/students",
        Some(serde_json::json!({"name": name, "email": email, "age": age})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}
