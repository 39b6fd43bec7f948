//! Axum route handlers for the Chat API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::debug;

use crate::chat::context::resolve_chat_context;
use crate::chat::CHAT_MAX_TOKENS;
use crate::errors::{require_field, AppError};
use crate::llm_client::Backend;
use crate::models::chat::ChatReply;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: String,
    pub analysis_id: Option<String>,
}

/// POST /api/chat
///
/// Grounds the reply in `analysis_id` when it resolves; otherwise answers generally.
/// The reply text is passed through from the model unparsed.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    require_field(&request.session_id, "session_id")?;
    require_field(&request.message, "message")?;

    let analysis = match request.analysis_id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => state.store.get_analysis(id).await?,
        None => None,
    };

    let plan = resolve_chat_context(&request.message, analysis.as_ref());
    debug!(
        "Chat for session {}: grounded={}, has_actions={}",
        request.session_id, plan.grounded, plan.has_actions
    );

    let generation = state
        .llm
        .invoke(Backend::Secondary, &plan.prompt, CHAT_MAX_TOKENS)
        .await;

    Ok(Json(ChatReply {
        message: generation.text,
        timestamp: Utc::now(),
        has_actions: plan.has_actions,
    }))
}
