// Chat prompt variants. Built with format! rather than template replacement
// because every interpolated field is user-controlled.

use crate::models::analysis::AnalysisRecord;

/// Chat prompt grounded in a prior analysis: filename, role, score and found keywords.
pub fn grounded_chat_prompt(message: &str, analysis: &AnalysisRecord) -> String {
    let keywords = if analysis.keywords.found.is_empty() {
        "none".to_string()
    } else {
        analysis.keywords.found.join(", ")
    };

    format!(
        "The user uploaded a CV named \"{filename}\". \
         Previous analysis: identified role: {role}; ATS score: {score}%; \
         keywords found: {keywords}.\n\
         Use these results to give specific, actionable advice.\n\n\
         User: {message}\n\
         Assistant:",
        filename = analysis.filename,
        role = analysis.identified_role,
        score = analysis.ats_score,
    )
}

/// Chat prompt with no analysis to draw on.
pub fn general_chat_prompt(message: &str) -> String {
    format!(
        "The user has not shared a CV analysis yet. \
         Answer their question about CVs or job searching, and mention that uploading \
         a CV gives ATS scoring, keyword optimization and personalized suggestions.\n\n\
         User: {message}\n\
         Assistant:"
    )
}
