//! Heuristic Scorer: deterministic, model-free ATS compatibility score.
//!
//! Algorithm:
//! 1. Start at 70
//! 2. +5 if the text is longer than 500 characters
//! 3. +10 if any extracted keyword occurs in the text (case-insensitive)
//! 4. +5 if the text mentions "experience"
//! 5. +10 if the text contains an action verb (achieved, developed, managed, led)
//! 6. Cap at 95. Rule-based confidence never reaches 100.
//!
//! `role_match` is derived from the score, not scored independently.

use crate::models::analysis::KeywordSet;

pub const BASE_SCORE: u8 = 70;
pub const MAX_SCORE: u8 = 95;
pub const MAX_ROLE_MATCH: u8 = 85;

const LENGTH_THRESHOLD_CHARS: usize = 500;
const LENGTH_BONUS: u8 = 5;
const KEYWORD_BONUS: u8 = 10;
const EXPERIENCE_BONUS: u8 = 5;
const ACTION_VERB_BONUS: u8 = 10;

pub const ACTION_VERBS: [&str; 4] = ["achieved", "developed", "managed", "led"];

/// Keywords recruiters commonly screen for. `missing` is drawn from this list.
pub const COMMON_KEYWORDS: [&str; 10] = [
    "Docker",
    "Kubernetes",
    "AWS",
    "GraphQL",
    "CI/CD",
    "Agile",
    "SQL",
    "Git",
    "REST APIs",
    "Leadership",
];
pub const MAX_MISSING_KEYWORDS: usize = 4;

pub fn compute_ats_score(cv_text: &str, keywords: &[String]) -> u8 {
    let text = cv_text.to_lowercase();
    let mut score = BASE_SCORE;

    if cv_text.chars().count() > LENGTH_THRESHOLD_CHARS {
        score += LENGTH_BONUS;
    }
    if keywords
        .iter()
        .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
    {
        score += KEYWORD_BONUS;
    }
    if text.contains("experience") {
        score += EXPERIENCE_BONUS;
    }
    if ACTION_VERBS.iter().any(|verb| text.contains(verb)) {
        score += ACTION_VERB_BONUS;
    }

    score.min(MAX_SCORE)
}

/// min(85, score + 5)
pub fn compute_role_match(score: u8) -> u8 {
    score.saturating_add(5).min(MAX_ROLE_MATCH)
}

/// Common keywords absent from both the text and the found list, in catalogue order.
pub fn find_missing_keywords(cv_text: &str, found: &[String]) -> Vec<String> {
    let text = cv_text.to_lowercase();
    let found: Vec<String> = found.iter().map(|k| k.to_lowercase()).collect();

    COMMON_KEYWORDS
        .iter()
        .filter(|keyword| {
            let keyword = keyword.to_lowercase();
            !text.contains(&keyword) && !found.contains(&keyword)
        })
        .take(MAX_MISSING_KEYWORDS)
        .map(|k| k.to_string())
        .collect()
}

/// Scores the text and assembles the keyword set in one pass.
pub fn score_keywords(cv_text: &str, found: Vec<String>) -> (u8, KeywordSet) {
    let score = compute_ats_score(cv_text, &found);
    let missing = find_missing_keywords(cv_text, &found);
    (
        score,
        KeywordSet {
            found,
            missing,
            role_match: compute_role_match(score),
        },
    )
}
