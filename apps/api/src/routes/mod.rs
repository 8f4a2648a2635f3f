pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

/// Headroom for the non-file multipart fields on top of the upload cap.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/cover-letters", post(handlers::handle_generate))
        .route("/api/v1/cover-letters/upload", post(handlers::handle_upload))
        .route("/api/v1/cover-letters/parse", post(handlers::handle_parse))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
