use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version, credential state, and the number of live chat sessions.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let status = if state.config.is_degraded() { "degraded" } else { "ok" };
    let active_sessions = state.sessions.len().await;
    Json(json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "ohs-advisor",
        "model": state.config.model,
        "active_sessions": active_sessions,
    }))
}
