//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::analyzer::{analyze_cv, AnalyzeRequest};
use crate::analysis::prompts::truncate_chars;
use crate::errors::{require_field, AppError};
use crate::models::analysis::AnalysisRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DebugParseRequest {
    #[serde(default)]
    pub cv_text: String,
    pub filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DebugParseResponse {
    pub filename: String,
    pub text_length: usize,
    pub word_count: usize,
    pub line_count: usize,
    pub first_200_chars: String,
    pub last_200_chars: String,
    pub full_text: String,
    pub success: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze
///
/// Runs the full pipeline, stores the record, and links it to the session when
/// the session exists.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisRecord>, AppError> {
    require_field(&request.session_id, "session_id")?;
    require_field(&request.cv_text, "cv_text")?;
    require_field(&request.filename, "filename")?;

    info!(
        "Analyzing {} ({} chars, {:?} bytes) for session {}",
        request.filename,
        request.cv_text.chars().count(),
        request.file_size,
        request.session_id
    );

    let record = analyze_cv(&state.llm, &request.cv_text)
        .await
        .into_record(&request);

    state.store.put_analysis(record.clone()).await?;
    let linked = state
        .store
        .append_analysis(&request.session_id, &record.id)
        .await?;
    if !linked {
        debug!(
            "Session {} not found; analysis {} stored unlinked",
            request.session_id, record.id
        );
    }

    Ok(Json(record))
}

/// GET /api/analysis/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(analysis_id): Path<String>,
) -> Result<Json<AnalysisRecord>, AppError> {
    state
        .store
        .get_analysis(&analysis_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {analysis_id} not found")))
}

/// POST /api/debug/parse
///
/// Echoes text statistics so clients can check their document extraction.
pub async fn handle_debug_parse(
    Json(request): Json<DebugParseRequest>,
) -> Result<Json<DebugParseResponse>, AppError> {
    require_field(&request.cv_text, "cv_text")?;

    let text = request.cv_text;
    let filename = request
        .filename
        .filter(|f| !f.trim().is_empty())
        .unwrap_or_else(|| "unknown.pdf".to_string());
    let text_length = text.chars().count();
    let word_count = text.split_whitespace().count();

    debug!("Debug parse of {filename}: {text_length} chars, {word_count} words");

    Ok(Json(DebugParseResponse {
        filename,
        text_length,
        word_count,
        line_count: text.split('\n').count(),
        first_200_chars: truncate_chars(&text, 200).to_string(),
        last_200_chars: last_chars(&text, 200).to_string(),
        full_text: text.clone(),
        success: true,
    }))
}

fn last_chars(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
