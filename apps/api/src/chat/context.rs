//! Context Resolver: decides whether a chat turn is grounded in a prior analysis
//! and whether the reply should surface follow-up actions. Makes no model calls.

use crate::chat::prompts::{general_chat_prompt, grounded_chat_prompt};
use crate::models::analysis::AnalysisRecord;

/// Words that make a grounded reply action-triggering.
pub const ACTION_TRIGGERS: [&str; 7] = [
    "analyze",
    "score",
    "keywords",
    "suggestions",
    "interview",
    "improve",
    "feedback",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPlan {
    pub prompt: String,
    pub grounded: bool,
    pub has_actions: bool,
}

/// `analysis` is the already-resolved record; `None` covers both "no id given" and
/// "id not found".
pub fn resolve_chat_context(message: &str, analysis: Option<&AnalysisRecord>) -> ChatPlan {
    match analysis {
        Some(record) => {
            let lowered = message.to_lowercase();
            ChatPlan {
                prompt: grounded_chat_prompt(message, record),
                grounded: true,
                has_actions: ACTION_TRIGGERS.iter().any(|word| lowered.contains(word)),
            }
        }
        None => ChatPlan {
            prompt: general_chat_prompt(message),
            grounded: false,
            has_actions: false,
        },
    }
}
