// Conversational endpoint, optionally grounded in a stored analysis.

pub mod context;
pub mod handlers;
pub mod prompts;

/// Output token cap for chat replies.
pub const CHAT_MAX_TOKENS: u32 = 250;
