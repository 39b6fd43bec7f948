use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status and whether the chat model is available.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let secondary = if state.llm.secondary_available() {
        "available"
    } else {
        "unavailable"
    };

    Json(json!({
        "status": "healthy",
        "service": "cv-insight-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "secondary_model": secondary
    }))
}
