//! CV Analysis: orchestrates the five extraction tasks and the heuristic score.
//!
//! Flow: keywords → role → interview questions (uses role) → suggestions →
//!       strengths/areas → score (uses keywords) → AnalysisRecord.
//!
//! Tasks run one after another within the request. No task can fail the run:
//! each degrades to its fallback and the degradation is recorded in `fallbacks`.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::parser::{
    parse_interview_questions, parse_keywords, parse_role, parse_strengths_areas,
    parse_suggestions, Outcome,
};
use crate::analysis::prompts::{
    interview_prompt, keywords_prompt, role_prompt, strengths_prompt, suggestions_prompt,
    truncate_chars,
};
use crate::analysis::scoring::score_keywords;
use crate::analysis::Task;
use crate::llm_client::{Backend, ModelClient};
use crate::models::analysis::{AnalysisRecord, DebugInfo, KeywordSet, TaskFallback};

/// Request body for a CV analysis. Missing fields deserialize as empty and are
/// rejected by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub cv_text: String,
    #[serde(default)]
    pub filename: String,
    pub file_size: Option<u64>,
}

/// The model-derived and scored fields of one analysis.
#[derive(Debug, Clone)]
pub struct CvAnalysis {
    pub ats_score: u8,
    pub identified_role: String,
    pub keywords: KeywordSet,
    pub suggestions: Vec<String>,
    pub interview_questions: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
    pub fallbacks: Vec<TaskFallback>,
}

/// Runs every extraction task against the primary backend and scores the result.
pub async fn analyze_cv(llm: &ModelClient, cv_text: &str) -> CvAnalysis {
    let mut fallbacks = Vec::new();

    let keywords = generate(llm, Task::Keywords, &keywords_prompt(cv_text)).await;
    let keywords = settle(&mut fallbacks, Task::Keywords, parse_keywords(&keywords));

    let role = generate(llm, Task::Role, &role_prompt(cv_text)).await;
    let identified_role = settle(&mut fallbacks, Task::Role, parse_role(&role));

    let questions = generate(
        llm,
        Task::InterviewQuestions,
        &interview_prompt(cv_text, &identified_role),
    )
    .await;
    let interview_questions = settle(
        &mut fallbacks,
        Task::InterviewQuestions,
        parse_interview_questions(&questions, &identified_role),
    );

    let suggestions = generate(llm, Task::Suggestions, &suggestions_prompt(cv_text)).await;
    let suggestions = settle(&mut fallbacks, Task::Suggestions, parse_suggestions(&suggestions));

    let review = generate(llm, Task::StrengthsAreas, &strengths_prompt(cv_text)).await;
    let (strengths, areas) = parse_strengths_areas(&review);
    let strengths = settle(&mut fallbacks, Task::StrengthsAreas, strengths);
    let areas_to_improve = settle(&mut fallbacks, Task::StrengthsAreas, areas);

    let (ats_score, keywords) = score_keywords(cv_text, keywords);

    CvAnalysis {
        ats_score,
        identified_role,
        keywords,
        suggestions,
        interview_questions,
        strengths,
        areas_to_improve,
        fallbacks,
    }
}

async fn generate(llm: &ModelClient, task: Task, prompt: &str) -> String {
    llm.invoke(Backend::Primary, prompt, task.max_tokens())
        .await
        .text
}

fn settle<T>(fallbacks: &mut Vec<TaskFallback>, task: Task, outcome: Outcome<T>) -> T {
    if let Some(reason) = outcome.fallback_reason() {
        warn!("{} fell back to defaults ({})", task.as_str(), reason.as_str());
        let entry = TaskFallback {
            task: task.as_str().to_string(),
            reason: reason.as_str().to_string(),
        };
        // strengths and areas share a task; record each (task, reason) once
        if !fallbacks.contains(&entry) {
            fallbacks.push(entry);
        }
    }
    outcome.into_value()
}

impl CvAnalysis {
    /// Stamps the analysis with a fresh id and the request metadata.
    pub fn into_record(self, request: &AnalyzeRequest) -> AnalysisRecord {
        let record = AnalysisRecord {
            id: Uuid::new_v4().to_string(),
            session_id: request.session_id.clone(),
            filename: request.filename.clone(),
            file_size: request.file_size,
            created_at: Utc::now(),
            debug_info: DebugInfo {
                text_length: request.cv_text.chars().count(),
                word_count: request.cv_text.split_whitespace().count(),
                first_100_chars: preview(&request.cv_text, 100),
                parsing_successful: self.fallbacks.is_empty(),
                fallbacks: self.fallbacks,
            },
            ats_score: self.ats_score,
            identified_role: self.identified_role,
            keywords: self.keywords,
            suggestions: self.suggestions,
            interview_questions: self.interview_questions,
            strengths: self.strengths,
            areas_to_improve: self.areas_to_improve,
        };

        info!(
            "Analysis {} for {}: score={}, role={}, fallbacks={}",
            record.id,
            record.filename,
            record.ats_score,
            record.identified_role,
            record.debug_info.fallbacks.len()
        );
        record
    }
}

/// First `max_chars` characters, with an ellipsis when the text was longer.
fn preview(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    if head.len() < text.len() {
        format!("{head}...")
    } else {
        head.to_string()
    }
}
