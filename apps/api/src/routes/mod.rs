pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::chat::handlers as chat;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/session", post(sessions::handle_create_session))
        .route(
            "/api/session/:id/analyses",
            get(sessions::handle_session_analyses),
        )
        // Analysis
        .route("/api/analyze", post(analysis::handle_analyze))
        .route("/api/analysis/:id", get(analysis::handle_get_analysis))
        .route("/api/debug/parse", post(analysis::handle_debug_parse))
        // Chat
        .route("/api/chat", post(chat::handle_chat))
        .with_state(state)
}
