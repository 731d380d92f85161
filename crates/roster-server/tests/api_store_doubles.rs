mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::send;
use roster_server::{app, app_with_cors, config::CorsConfig, AppState};
use roster_students::{StudentError, StudentStore};
use roster_types::{PageRequest, Student, StudentFields, StudentPage, StudentWithMarks};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Store whose every operation fails like an unreachable database.
struct BrokenStore;

fn unavailable() -> StudentError {
    StudentError::Database(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
        Some("unable to open database file".to_string()),
    ))
}

impl StudentStore for BrokenStore {
    fn create(&self, _fields: &StudentFields) -> Result<Student, StudentError> {
        Err(unavailable())
    }

    fn list_page(&self, _request: PageRequest) -> Result<StudentPage, StudentError> {
        Err(unavailable())
    }

    fn get_with_marks(&self, _id: i64) -> Result<StudentWithMarks, StudentError> {
        Err(unavailable())
    }

    fn update(&self, _id: i64, _fields: &StudentFields) -> Result<Student, StudentError> {
        Err(unavailable())
    }

    fn delete(&self, _id: i64) -> Result<(), StudentError> {
        Err(unavailable())
    }
}

/// Store that records the page requests it receives.
#[derive(Default)]
struct RecordingStore {
    requests: Arc<Mutex<Vec<PageRequest>>>,
}

impl StudentStore for RecordingStore {
    fn create(&self, fields: &StudentFields) -> Result<Student, StudentError> {
        let text = |field: &Option<Value>| {
            field.as_ref().and_then(Value::as_str).unwrap_or_default().to_string()
        };
        Ok(Student {
            id: 1,
            name: text(&fields.name),
            email: text(&fields.email),
            age: fields.age.as_ref().and_then(Value::as_i64).unwrap_or_default(),
        })
    }

    fn list_page(&self, request: PageRequest) -> Result<StudentPage, StudentError> {
        self.requests.lock().unwrap().push(request);
        Ok(StudentPage {
            total: 0,
            page: request.page(),
            limit: request.limit(),
            students: Vec::new(),
        })
    }

    fn get_with_marks(&self, id: i64) -> Result<StudentWithMarks, StudentError> {
        Err(StudentError::NotFound(id))
    }

    fn update(&self, id: i64, _fields: &StudentFields) -> Result<Student, StudentError> {
        Err(StudentError::NotFound(id))
    }

    fn delete(&self, id: i64) -> Result<(), StudentError> {
        Err(StudentError::NotFound(id))
    }
}

#[tokio::test]
async fn store_failures_surface_as_500_with_raw_message() {
    let app = app(AppState::new(BrokenStore));
    let body = json!({"name": "Ann", "email": "a@x.com", "age": 20});
    let expected = json!({"error": "unable to open database file"});

    let cases = [
        ("POST", "/students", Some(body.clone())),
        ("GET", "/students", None),
        ("GET", "/students/1", None),
        ("PUT", "/students/1", Some(body)),
        ("DELETE", "/students/1", None),
    ];

    for (method, uri, payload) in cases {
        let (status, response) = send(&app, method, uri, payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(response, expected, "{method} {uri}");
    }
}

#[tokio::test]
async fn handlers_pass_parsed_page_request_to_store() {
    let store = RecordingStore::default();
    let requests = store.requests.clone();
    let app = app(AppState::new(store));

    send(&app, "GET", "/students?page=4&limit=10", None).await;
    send(&app, "GET", "/students?page=oops", None).await;

    let seen = requests.lock().unwrap().clone();
    assert_eq!(seen, vec![PageRequest::new(4, 10), PageRequest::new(1, 5)]);
    assert_eq!(seen[0].offset(), 30);
}

#[tokio::test]
async fn not_found_from_store_maps_to_404() {
    let app = app(AppState::new(RecordingStore::default()));

    let (status, body) = send(&app, "DELETE", "/students/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Student not found"}));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = app(AppState::new(RecordingStore::default()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/students")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn cors_restricts_to_configured_origins() {
    let cors = CorsConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
    };
    let app = app_with_cors(AppState::new(RecordingStore::default()), &cors);

    let allowed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/students")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let other = app
        .oneshot(
            Request::builder()
                .uri("/students")
                .header("origin", "http://evil.test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(other.headers().get("access-control-allow-origin").is_none());
}
