// Cross-cutting prompt fragments shared by every backend.
// Task prompts live in analysis::prompts.

/// System message sent with every chat-backend call.
pub const CHAT_SYSTEM: &str = "You are a helpful CV analysis assistant. \
    Provide concise, actionable advice for improving CVs and job search strategies.";
