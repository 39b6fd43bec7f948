// CV analysis pipeline.
// Five independent prompt → generate → parse tasks plus rule-based scoring.
// All generation goes through llm_client; no direct backend calls here.

pub mod analyzer;
pub mod handlers;
pub mod parser;
pub mod prompts;
pub mod scoring;

/// The model-backed extraction tasks of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Keywords,
    Role,
    Suggestions,
    InterviewQuestions,
    StrengthsAreas,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Keywords => "keywords",
            Task::Role => "identified_role",
            Task::Suggestions => "suggestions",
            Task::InterviewQuestions => "interview_questions",
            Task::StrengthsAreas => "strengths_areas",
        }
    }

    /// Output token cap passed to the primary backend.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Task::Keywords => 100,
            Task::Role => 50,
            Task::Suggestions => 200,
            Task::InterviewQuestions => 250,
            Task::StrengthsAreas => 200,
        }
    }

    /// Characters of CV text embedded in the prompt.
    pub fn input_budget(&self) -> usize {
        match self {
            Task::Keywords | Task::Suggestions | Task::StrengthsAreas => 2000,
            Task::Role | Task::InterviewQuestions => 1500,
        }
    }
}
