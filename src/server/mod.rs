use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::Mutex;

use crate::classifier::Classify;
use crate::content::ContentRegistry;
use crate::session::SessionContext;

mod error;
pub mod render;
mod routes;

pub use error::AppError;

/// Camera frames are re-encoded JPEGs and stay well under this, but phone
/// photos can be large.
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

pub type AppState = Arc<State>;

/// Everything the page handlers need: the loaded classifier, the curated
/// content registry, and the single browser session's state.
pub struct State {
    pub classifier: Arc<dyn Classify>,
    pub registry: Arc<ContentRegistry>,
    pub session: Mutex<SessionContext>,
}

impl State {
    pub fn new(classifier: Arc<dyn Classify>, registry: Arc<ContentRegistry>) -> Self {
        Self {
            classifier,
            registry,
            session: Mutex::new(SessionContext::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/classify", post(routes::classify))
        .route("/preview", get(routes::preview))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
