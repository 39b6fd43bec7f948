use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single chat reply. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub has_actions: bool,
}
