use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and active backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let backend = state.generator.backend();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "coverletter-api",
        "backend": backend.backend_name(),
        "model": backend.model(),
        "dialect": state.generator.dialect().to_string(),
    }))
}
