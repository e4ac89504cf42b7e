#![forbid(unsafe_code)]

use async_trait::async_trait;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use qscore_model::{NewSubmission, StoredSubmission};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod store;

pub const CRATE_NAME: &str = "qscore-server";

pub use config::{validate_startup_config, ApiConfig};
pub use store::memory::MemoryStore;
pub use store::sqlite::SqliteStore;

#[derive(Debug)]
pub struct StorageError(pub String);

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl std::error::Error for StorageError {}

/// Persistence contract for submission records.
///
/// Implementations assign `id` and `created_at` at insert time and must
/// return query results newest first (`created_at` descending); the
/// aggregation layer computes its own max regardless, but the list
/// endpoints surface the store ordering directly.
#[async_trait]
pub trait SubmissionStore: Send + Sync + 'static {
    async fn insert(&self, submission: NewSubmission) -> Result<StoredSubmission, StorageError>;
    async fn find_all(&self) -> Result<Vec<StoredSubmission>, StorageError>;
    async fn find_by_name(&self, name: &str) -> Result<Vec<StoredSubmission>, StorageError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<StoredSubmission>, StorageError>;
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub api: ApiConfig,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<dyn SubmissionStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/health", get(http::handlers::health_handler))
        .route(
            "/api/questionnaires",
            post(http::handlers::submit_handler).get(http::handlers::list_handler),
        )
        .route(
            "/api/questionnaires/summaries",
            get(http::handlers::summaries_handler),
        )
        .route(
            "/api/questionnaires/:name",
            get(http::handlers::by_name_handler),
        )
        .fallback(http::handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
