// All prompt templates for the analysis module.
// Each template embeds the CV text as `{cv_text}`, truncated to the task's budget.

use crate::analysis::Task;

pub const KEYWORDS_PROMPT_TEMPLATE: &str = "\
Extract the technical skills, tools and professional keywords from this CV. \
Return only a comma-separated list.

CV: {cv_text}

Keywords:";

pub const ROLE_PROMPT_TEMPLATE: &str = "\
What job role best fits the person described in this CV? \
Answer with a single job title only.

CV: {cv_text}

Job title:";

pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = "\
Give four specific suggestions to improve this CV for applicant tracking systems. \
Write each suggestion on its own line.

CV: {cv_text}

Suggestions:";

/// Replace `{role}` before `{cv_text}` so CV content is never re-substituted.
pub const INTERVIEW_PROMPT_TEMPLATE: &str = "\
Write five interview questions for a {role} candidate based on this CV. \
Write each question on its own line and end it with a question mark.

CV: {cv_text}

Questions:";

pub const STRENGTHS_PROMPT_TEMPLATE: &str = "\
Analyze this CV and list its strengths and the areas to improve. \
Answer in exactly this format:
STRENGTHS:
- first strength
- second strength
- third strength
AREAS TO IMPROVE:
- first area
- second area
- third area

CV: {cv_text}

Analysis:";

/// Hard prefix cut to at most `max_chars` characters. Never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn fill(template: &str, task: Task, cv_text: &str) -> String {
    template.replace("{cv_text}", truncate_chars(cv_text, task.input_budget()))
}

pub fn keywords_prompt(cv_text: &str) -> String {
    fill(KEYWORDS_PROMPT_TEMPLATE, Task::Keywords, cv_text)
}

pub fn role_prompt(cv_text: &str) -> String {
    fill(ROLE_PROMPT_TEMPLATE, Task::Role, cv_text)
}

pub fn suggestions_prompt(cv_text: &str) -> String {
    fill(SUGGESTIONS_PROMPT_TEMPLATE, Task::Suggestions, cv_text)
}

pub fn interview_prompt(cv_text: &str, role: &str) -> String {
    let template = INTERVIEW_PROMPT_TEMPLATE.replace("{role}", role);
    fill(&template, Task::InterviewQuestions, cv_text)
}

pub fn strengths_prompt(cv_text: &str) -> String {
    fill(STRENGTHS_PROMPT_TEMPLATE, Task::StrengthsAreas, cv_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_short_text_untouched() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
    }

    #[test]
    fn test_truncate_chars_is_prefix_cut() {
        assert_eq!(truncate_chars("Senior engineer. Led teams.", 8), "Senior e");
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("Résumé", 2), "Ré");
        assert_eq!(truncate_chars("ééé", 1), "é");
    }

    #[test]
    fn test_keywords_prompt_truncates_to_2000_chars() {
        let cv = "x".repeat(2500);
        let prompt = keywords_prompt(&cv);
        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(!prompt.contains(&"x".repeat(2001)));
        assert!(prompt.contains("comma-separated"));
    }

    #[test]
    fn test_role_prompt_truncates_to_1500_chars() {
        let cv = "y".repeat(1600);
        let prompt = role_prompt(&cv);
        assert!(prompt.contains(&"y".repeat(1500)));
        assert!(!prompt.contains(&"y".repeat(1501)));
        assert!(prompt.ends_with("Job title:"));
    }

    #[test]
    fn test_interview_prompt_embeds_role() {
        let prompt = interview_prompt("Rust developer at Acme", "Backend Engineer");
        assert!(prompt.contains("for a Backend Engineer candidate"));
        assert!(prompt.contains("Rust developer at Acme"));
        assert!(!prompt.contains("{role}"));
    }

    #[test]
    fn test_interview_prompt_does_not_substitute_inside_cv_text() {
        let prompt = interview_prompt("literal {role} token", "Nurse");
        assert!(prompt.contains("literal {role} token"));
    }

    #[test]
    fn test_strengths_prompt_asks_for_both_sections() {
        let prompt = strengths_prompt("cv");
        assert!(prompt.contains("STRENGTHS:"));
        assert!(prompt.contains("AREAS TO IMPROVE:"));
        assert_eq!(prompt.matches("\n- ").count(), 6);
    }

    #[test]
    fn test_suggestions_prompt_asks_for_four_lines() {
        let prompt = suggestions_prompt("cv");
        assert!(prompt.contains("four specific suggestions"));
        assert!(prompt.contains("own line"));
    }
}
