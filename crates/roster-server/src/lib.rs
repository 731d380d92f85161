//! Roster server library logic.
//!
//! Builds the axum router for the `/students` API around an injected
//! [`StudentStore`], plus the startup helpers used by the binary.

pub mod api;
pub mod api_students;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Extension, Json, Router,
};
use config::{Config, CorsConfig, LoggingConfig};
use roster_students::{SqliteStudentStore, StudentStore};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store handle. Handlers never reach the database any other way.
    pub store: Arc<dyn StudentStore>,
}

impl AppState {
    pub fn new(store: impl StudentStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Maximum request body size (2 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router, allowing any origin.
pub fn app(state: AppState) -> Router {
    app_with_cors(state, &CorsConfig::default())
}

/// Builds the application router with the given CORS policy.
pub fn app_with_cors(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/students",
            get(api_students::list_students_handler).post(api_students::create_student_handler),
        )
        .route(
            "/students/{id}",
            get(api_students::get_student_handler)
                .put(api_students::update_student_handler)
                .delete(api_students::delete_student_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors))
        .layer(Extension(Arc::new(state)))
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if cors.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Installs the global tracing subscriber.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Database(#[from] roster_db::PoolError),
}

/// Opens the database, applies pending migrations and builds the router.
///
/// # Errors
///
/// Returns `StartupError` if the database cannot be opened or migrated.
pub fn prepare_server(config: &Config) -> Result<Router, StartupError> {
    let pool =
        roster_db::open_roster_db(&config.database.path, config.database.runtime_settings())?;
    let state = AppState::new(SqliteStudentStore::new(pool));
    Ok(app_with_cors(state, &config.cors))
}
