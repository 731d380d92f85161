//! Handlers for the `/students` collection.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::Json,
};
use roster_students::StudentError;
use roster_types::{
    MessageBody, PageRequest, Student, StudentFields, StudentPage, StudentWithMarks,
    STUDENT_DELETED,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Raw `page`/`limit` query values. Kept as strings so that unusable input
/// falls back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.limit.as_deref())
    }
}

/// Runs a blocking store operation off the async runtime.
async fn run_store<T, F>(operation: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, StudentError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, operation, "store task join error");
            ApiError::InternalServerError(format!("task join error: {}", e))
        })?
        .map_err(ApiError::from)
}

/// An id that is not an integer can never have been assigned, so it is
/// reported the same way as an unknown one.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::student_not_found())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

/// Reads `name`, `email` and `age` from a request body without checking
/// their types. A body not declared as JSON, or an empty one, carries no
/// fields; only text that fails to parse as JSON is rejected.
fn decode_fields(headers: &HeaderMap, body: &Bytes) -> Result<StudentFields, ApiError> {
    if !is_json(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StudentFields::default());
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))?;
    Ok(StudentFields::from_body(value))
}

/// POST /students
pub async fn create_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let fields = decode_fields(&headers, &body)?;

    let store = state.store.clone();
    let student = run_store("create_student", move || store.create(&fields)).await?;

    tracing::info!(student_id = student.id, "student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /students?page=&limit=
pub async fn list_students_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<StudentPage>, ApiError> {
    let request = params.page_request();

    let store = state.store.clone();
    let page = run_store("list_students", move || store.list_page(request)).await?;

    Ok(Json(page))
}

/// GET /students/:id
pub async fn get_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<StudentWithMarks>, ApiError> {
    let id = parse_id(&id)?;

    let store = state.store.clone();
    let found = run_store("get_student", move || store.get_with_marks(id)).await?;

    Ok(Json(found))
}

/// PUT /students/:id
///
/// Replaces name, email and age together; absent body fields become `NULL`
/// and are rejected by the store.
pub async fn update_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Student>, ApiError> {
    let fields = decode_fields(&headers, &body)?;
    let id = parse_id(&id)?;

    let store = state.store.clone();
    let student = run_store("update_student", move || store.update(id, &fields)).await?;

    tracing::info!(student_id = id, "student updated");
    Ok(Json(student))
}

/// DELETE /students/:id
pub async fn delete_student_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    let id = parse_id(&id)?;

    let store = state.store.clone();
    run_store("delete_student", move || store.delete(id)).await?;

    tracing::info!(student_id = id, "student deleted");
    Ok(Json(MessageBody {
        message: STUDENT_DELETED.to_string(),
    }))
}
