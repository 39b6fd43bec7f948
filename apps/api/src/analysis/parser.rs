//! Response Parser: turns raw model text into the typed value each task needs.
//!
//! Every rule is total: it never fails and always yields a value. When the model
//! produced nothing (`GENERATION_FAILURE`) or its text does not parse into anything
//! usable, the task's fixed fallback is substituted and the `Outcome` records why.

use crate::llm_client::GENERATION_FAILURE;

pub const MAX_KEYWORDS: usize = 10;
pub const MAX_SUGGESTIONS: usize = 4;
pub const MAX_INTERVIEW_QUESTIONS: usize = 5;
pub const MAX_SECTION_ITEMS: usize = 3;

pub const FALLBACK_KEYWORDS: [&str; 4] = [
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Project Management",
];

pub const FALLBACK_ROLE: &str = "Software Developer";

pub const FALLBACK_SUGGESTIONS: [&str; 4] = [
    "Add more quantified achievements with specific numbers",
    "Include relevant technical keywords for better ATS matching",
    "Consider adding a professional summary section",
    "Use action verbs to start bullet points",
];

pub const FALLBACK_STRENGTHS: [&str; 3] = [
    "Strong technical keywords",
    "Well-structured format",
    "Relevant experience",
];

pub const FALLBACK_AREAS: [&str; 3] = [
    "Add more quantified achievements",
    "Include missing keywords",
    "Improve formatting consistency",
];

/// Labels a model may echo ahead of the role. Longest first.
const ROLE_LABELS: [&str; 5] = ["job title:", "job role:", "title:", "role:", "job:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Every backend failed; the raw text was the client's failure literal.
    GenerationFailed,
    /// The model answered but nothing usable could be parsed.
    Unparseable,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::GenerationFailed => "generation_failed",
            FallbackReason::Unparseable => "unparseable",
        }
    }
}

/// Result of parsing one task's output.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Parsed(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> Outcome<T> {
    pub fn value(&self) -> &T {
        match self {
            Outcome::Parsed(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Parsed(value) | Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Outcome::Parsed(_) => None,
            Outcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}

fn is_generation_failure(raw: &str) -> bool {
    raw.trim() == GENERATION_FAILURE
}

fn resolve<T>(
    raw: &str,
    parse: impl FnOnce(&str) -> Option<T>,
    fallback: impl FnOnce() -> T,
) -> Outcome<T> {
    if is_generation_failure(raw) {
        return Outcome::Fallback {
            value: fallback(),
            reason: FallbackReason::GenerationFailed,
        };
    }
    match parse(raw) {
        Some(value) => Outcome::Parsed(value),
        None => Outcome::Fallback {
            value: fallback(),
            reason: FallbackReason::Unparseable,
        },
    }
}

fn non_empty(items: Vec<String>) -> Option<Vec<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Per-task rules
// ────────────────────────────────────────────────────────────────────────────

/// Comma-separated list → trimmed, non-empty entries in order, at most 10.
pub fn parse_keywords(raw: &str) -> Outcome<Vec<String>> {
    resolve(
        raw,
        |text| {
            non_empty(
                text.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .take(MAX_KEYWORDS)
                    .map(str::to_string)
                    .collect(),
            )
        },
        || to_owned_list(&FALLBACK_KEYWORDS),
    )
}

/// Single job title, with one echoed leading label removed.
pub fn parse_role(raw: &str) -> Outcome<String> {
    resolve(
        raw,
        |text| {
            let role = strip_role_label(text.trim()).trim();
            if role.is_empty() {
                None
            } else {
                Some(role.to_string())
            }
        },
        || FALLBACK_ROLE.to_string(),
    )
}

fn strip_role_label(text: &str) -> &str {
    for label in ROLE_LABELS {
        let matches = text
            .get(..label.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(label));
        if matches {
            return &text[label.len()..];
        }
    }
    text
}

/// One suggestion per non-empty line, at most 4.
pub fn parse_suggestions(raw: &str) -> Outcome<Vec<String>> {
    resolve(
        raw,
        |text| {
            non_empty(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .take(MAX_SUGGESTIONS)
                    .map(str::to_string)
                    .collect(),
            )
        },
        || to_owned_list(&FALLBACK_SUGGESTIONS),
    )
}

/// Lines containing a question mark, at most 5. Falls back to role-specific questions.
pub fn parse_interview_questions(raw: &str, role: &str) -> Outcome<Vec<String>> {
    resolve(
        raw,
        |text| {
            non_empty(
                text.lines()
                    .map(str::trim)
                    .filter(|line| line.contains('?'))
                    .take(MAX_INTERVIEW_QUESTIONS)
                    .map(str::to_string)
                    .collect(),
            )
        },
        || fallback_interview_questions(role),
    )
}

pub fn fallback_interview_questions(role: &str) -> Vec<String> {
    vec![
        format!("Can you walk me through a challenging project you worked on as a {role}?"),
        format!("Which tools and technologies do you rely on most as a {role}?"),
        format!("How do you ensure the quality of your work in a {role} position?"),
        "What is your approach to debugging or resolving complex issues?".to_string(),
        format!("Where do you see your career as a {role} heading in the next few years?"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Strengths,
    Areas,
}

/// Bullet lines start with `-`, `•` or a single `*` (`**` is markdown bold, not a bullet).
fn strip_bullet(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
        return Some(rest.trim());
    }
    match line.strip_prefix('*') {
        Some(rest) if !rest.starts_with('*') => Some(rest.trim()),
        _ => None,
    }
}

/// Any non-bullet line naming a section opens it, wherever the name appears.
fn section_header(line: &str) -> Option<Section> {
    if strip_bullet(line).is_some() {
        return None;
    }
    let heading = line.to_uppercase();
    if heading.contains("STRENGTHS") {
        Some(Section::Strengths)
    } else if heading.contains("AREAS TO IMPROVE") || heading.contains("WEAKNESSES") {
        Some(Section::Areas)
    } else {
        None
    }
}

/// Two-section bullet format → (strengths, areas_to_improve).
///
/// Header lines switch the active section; bullet lines feed it until it holds 3
/// items. Bullets before any header are ignored. Each section falls back on its
/// own when it collected nothing.
pub fn parse_strengths_areas(raw: &str) -> (Outcome<Vec<String>>, Outcome<Vec<String>>) {
    if is_generation_failure(raw) {
        return (
            fallback_list(&FALLBACK_STRENGTHS, FallbackReason::GenerationFailed),
            fallback_list(&FALLBACK_AREAS, FallbackReason::GenerationFailed),
        );
    }

    let mut strengths: Vec<String> = Vec::new();
    let mut areas: Vec<String> = Vec::new();
    let mut active: Option<Section> = None;

    for line in raw.lines().map(str::trim) {
        if let Some(section) = section_header(line) {
            active = Some(section);
            continue;
        }
        let (Some(section), Some(item)) = (active, strip_bullet(line)) else {
            continue;
        };
        let bucket = match section {
            Section::Strengths => &mut strengths,
            Section::Areas => &mut areas,
        };
        if bucket.len() < MAX_SECTION_ITEMS && !item.is_empty() {
            bucket.push(item.to_string());
        }
    }

    (
        settle_section(strengths, &FALLBACK_STRENGTHS),
        settle_section(areas, &FALLBACK_AREAS),
    )
}

fn settle_section(items: Vec<String>, fallback: &[&str]) -> Outcome<Vec<String>> {
    match non_empty(items) {
        Some(items) => Outcome::Parsed(items),
        None => fallback_list(fallback, FallbackReason::Unparseable),
    }
}

fn fallback_list(items: &[&str], reason: FallbackReason) -> Outcome<Vec<String>> {
    Outcome::Fallback {
        value: to_owned_list(items),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_drop_empty_segments_and_keep_order() {
        let outcome = parse_keywords("Python, React, , Node.js");
        assert_eq!(
            outcome,
            Outcome::Parsed(vec![
                "Python".to_string(),
                "React".to_string(),
                "Node.js".to_string()
            ])
        );
    }

    #[test]
    fn test_keywords_capped_at_ten() {
        let raw = (1..=15).map(|i| format!("k{i}")).collect::<Vec<_>>().join(",");
        let keywords = parse_keywords(&raw).into_value();
        assert_eq!(keywords.len(), 10);
        assert_eq!(keywords[0], "k1");
        assert_eq!(keywords[9], "k10");
    }

    #[test]
    fn test_keywords_only_commas_falls_back_unparseable() {
        let outcome = parse_keywords(" , ,, ");
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(outcome.value().len(), 4);
        assert_eq!(outcome.value()[0], "Communication");
    }

    #[test]
    fn test_generation_failure_is_distinguished_from_unparseable() {
        let outcome = parse_keywords(GENERATION_FAILURE);
        assert_eq!(
            outcome.fallback_reason(),
            Some(FallbackReason::GenerationFailed)
        );
        assert_eq!(outcome.into_value(), to_owned_list(&FALLBACK_KEYWORDS));
    }

    #[test]
    fn test_role_strips_echoed_label() {
        assert_eq!(
            parse_role("  Job title: Data Engineer \n").into_value(),
            "Data Engineer"
        );
        assert_eq!(parse_role("ROLE: Nurse").into_value(), "Nurse");
        assert_eq!(parse_role("Product Manager").into_value(), "Product Manager");
    }

    #[test]
    fn test_role_label_only_falls_back() {
        let outcome = parse_role("Job title:   ");
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(outcome.into_value(), FALLBACK_ROLE);
    }

    #[test]
    fn test_role_non_ascii_prefix_does_not_panic() {
        assert_eq!(parse_role("Ingénieur logiciel").into_value(), "Ingénieur logiciel");
        assert_eq!(parse_role("é").into_value(), "é");
    }

    #[test]
    fn test_suggestions_split_on_lines_and_cap_at_four() {
        let raw = "Add metrics\n\n  Use action verbs  \nAdd a summary\nShorten to two pages\nFix typos";
        let outcome = parse_suggestions(raw);
        assert_eq!(
            outcome,
            Outcome::Parsed(vec![
                "Add metrics".to_string(),
                "Use action verbs".to_string(),
                "Add a summary".to_string(),
                "Shorten to two pages".to_string(),
            ])
        );
    }

    #[test]
    fn test_suggestions_blank_output_falls_back() {
        let outcome = parse_suggestions("\n  \n");
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(outcome.value().len(), 4);
    }

    #[test]
    fn test_interview_questions_drop_lines_without_question_mark() {
        let raw = "Here are some questions:\n\
                   What is ownership in Rust?\n\
                   Describe a hard bug.\n\
                   How do you test async code?";
        let questions = parse_interview_questions(raw, "Rust Engineer").into_value();
        assert_eq!(
            questions,
            vec![
                "What is ownership in Rust?".to_string(),
                "How do you test async code?".to_string()
            ]
        );
    }

    #[test]
    fn test_interview_questions_capped_at_five() {
        let raw = (1..=8)
            .map(|i| format!("Question {i}?"))
            .collect::<Vec<_>>()
            .join("\n");
        let questions = parse_interview_questions(&raw, "Analyst").into_value();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[4], "Question 5?");
    }

    #[test]
    fn test_interview_questions_fallback_uses_role() {
        let outcome = parse_interview_questions("No questions here.", "Data Scientist");
        assert_eq!(outcome.fallback_reason(), Some(FallbackReason::Unparseable));
        let questions = outcome.into_value();
        assert_eq!(questions.len(), 5);
        assert!(questions.iter().all(|q| q.contains('?')));
        assert!(questions[0].contains("Data Scientist"));
    }

    #[test]
    fn test_strengths_areas_well_formed() {
        let raw = "STRENGTHS:\n- Clear layout\n- Strong Rust skills\n- Quantified impact\n\
                   AREAS TO IMPROVE:\n- Add a summary\n- Mention cloud tools\n- Trim length";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert_eq!(
            strengths,
            Outcome::Parsed(vec![
                "Clear layout".to_string(),
                "Strong Rust skills".to_string(),
                "Quantified impact".to_string()
            ])
        );
        assert_eq!(areas.value().len(), 3);
        assert_eq!(areas.value()[2], "Trim length");
    }

    #[test]
    fn test_strengths_areas_fail_independently() {
        let raw = "STRENGTHS:\n- Clear layout\n- Strong Rust skills";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert_eq!(
            strengths,
            Outcome::Parsed(vec![
                "Clear layout".to_string(),
                "Strong Rust skills".to_string()
            ])
        );
        assert_eq!(areas.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(areas.into_value(), to_owned_list(&FALLBACK_AREAS));
    }

    #[test]
    fn test_strengths_areas_caps_each_section_at_three() {
        let raw = "Strengths:\n- a\n- b\n- c\n- d\nWeaknesses:\n• e\n* f\n- g\n- h";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert_eq!(strengths.into_value(), vec!["a", "b", "c"]);
        assert_eq!(areas.into_value(), vec!["e", "f", "g"]);
    }

    #[test]
    fn test_strengths_areas_headers_are_case_insensitive_and_markdown_tolerant() {
        let raw = "**strengths:**\n- Concise\n## Areas to improve\n- Add links";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert_eq!(strengths.into_value(), vec!["Concise"]);
        assert_eq!(areas.into_value(), vec!["Add links"]);
    }

    #[test]
    fn test_strengths_areas_header_name_mid_line() {
        let raw = "Key Strengths:\n- Clear layout\n- Rust\nMain areas to improve:\n- Add summary";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert_eq!(
            strengths,
            Outcome::Parsed(vec!["Clear layout".to_string(), "Rust".to_string()])
        );
        assert_eq!(areas, Outcome::Parsed(vec!["Add summary".to_string()]));

        let (strengths, areas) = parse_strengths_areas("1. STRENGTHS:\n- a\n2. Weaknesses\n- b");
        assert_eq!(strengths.into_value(), vec!["a"]);
        assert_eq!(areas.into_value(), vec!["b"]);
    }

    #[test]
    fn test_strengths_areas_bullets_before_any_header_are_ignored() {
        let raw = "- orphan\nSTRENGTHS:\n- kept";
        let (strengths, _) = parse_strengths_areas(raw);
        assert_eq!(strengths.into_value(), vec!["kept"]);
    }

    #[test]
    fn test_strengths_areas_bullet_mentioning_strengths_is_not_a_header() {
        let raw = "AREAS TO IMPROVE:\n- Highlight strengths earlier";
        let (strengths, areas) = parse_strengths_areas(raw);
        assert!(strengths.fallback_reason().is_some());
        assert_eq!(areas.into_value(), vec!["Highlight strengths earlier"]);
    }

    #[test]
    fn test_strengths_areas_no_headers_both_fall_back() {
        let (strengths, areas) = parse_strengths_areas("The CV looks fine overall.");
        assert_eq!(strengths.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(areas.fallback_reason(), Some(FallbackReason::Unparseable));
        assert_eq!(strengths.into_value(), to_owned_list(&FALLBACK_STRENGTHS));
    }

    #[test]
    fn test_strengths_areas_generation_failure() {
        let (strengths, areas) = parse_strengths_areas(GENERATION_FAILURE);
        assert_eq!(
            strengths.fallback_reason(),
            Some(FallbackReason::GenerationFailed)
        );
        assert_eq!(areas.fallback_reason(), Some(FallbackReason::GenerationFailed));
    }
}
