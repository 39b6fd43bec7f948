//! Axum route handlers for the Session API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::analysis::AnalysisSummary;
use crate::models::session::SessionRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
}

/// POST /api/session
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session = SessionRecord::new();
    let session_id = session.id.clone();
    state.store.put_session(session).await?;
    info!("Created session {session_id}");
    Ok(Json(CreateSessionResponse { session_id }))
}

/// GET /api/session/:id/analyses
///
/// Summaries in submission order. Ids that no longer resolve are skipped.
pub async fn handle_session_analyses(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<AnalysisSummary>>, AppError> {
    let session = state
        .store
        .get_session(&session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let mut summaries = Vec::with_capacity(session.analyses.len());
    for analysis_id in &session.analyses {
        match state.store.get_analysis(analysis_id).await? {
            Some(record) => summaries.push(AnalysisSummary::from(&record)),
            None => warn!("Session {session_id} references missing analysis {analysis_id}"),
        }
    }

    Ok(Json(summaries))
}
