//! Error type shared by all HTTP handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roster_students::StudentError;
use roster_types::{ErrorBody, STUDENT_NOT_FOUND};
use thiserror::Error;

/// API error type mapping to HTTP status codes.
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl ApiError {
    pub(crate) fn student_not_found() -> Self {
        ApiError::NotFound(STUDENT_NOT_FOUND.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// `NotFound` → 404 with the fixed message; everything else → 500 carrying
/// the underlying message (logged).
impl From<StudentError> for ApiError {
    fn from(e: StudentError) -> Self {
        match e {
            StudentError::NotFound(id) => {
                tracing::debug!(student_id = id, "student not found");
                ApiError::student_not_found()
            }
            err => {
                tracing::error!(error = %err, "student operation failed");
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}
