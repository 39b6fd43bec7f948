use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user session. `analyses` is append-only and holds AnalysisRecord ids in
/// submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub analyses: Vec<String>,
}

impl SessionRecord {
    /// Creates a fresh session with an id of the form `cv_session_<unix-secs>_<8 hex>`.
    pub fn new() -> Self {
        let created_at = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("cv_session_{}_{}", created_at.timestamp(), &suffix[..8]),
            created_at,
            analyses: Vec::new(),
        }
    }
}

impl Default for SessionRecord {
    fn default() -> Self {
        Self::new()
    }
}
