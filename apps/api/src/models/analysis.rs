use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Keyword coverage of a CV: what was found, what is commonly expected but absent,
/// and a derived role-match percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    pub role_match: u8,
}

/// A task whose value came from its fallback constant, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFallback {
    pub task: String,
    pub reason: String,
}

/// Diagnostics about the submitted text and the pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugInfo {
    pub text_length: usize,
    pub word_count: usize,
    pub first_100_chars: String,
    pub parsing_successful: bool,
    pub fallbacks: Vec<TaskFallback>,
}

/// One completed CV analysis. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub session_id: String,
    pub filename: String,
    pub file_size: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub debug_info: DebugInfo,
    /// 0 – 100. The heuristic scorer never exceeds 95.
    pub ats_score: u8,
    pub identified_role: String,
    pub keywords: KeywordSet,
    pub suggestions: Vec<String>,
    pub interview_questions: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_to_improve: Vec<String>,
}

/// Compact view used when listing a session's analyses.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub filename: String,
    pub ats_score: u8,
    pub identified_role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AnalysisRecord> for AnalysisSummary {
    fn from(record: &AnalysisRecord) -> Self {
        Self {
            id: record.id.clone(),
            filename: record.filename.clone(),
            ats_score: record.ats_score,
            identified_role: record.identified_role.clone(),
            created_at: record.created_at,
        }
    }
}
