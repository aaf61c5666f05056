//! Prompt templates for quiz synthesis.
//!
//! Two templates exist: one writes fresh questions from study material, the
//! other reformats a quiz that is already in the document. `PromptMode::Auto`
//! picks between them by looking at the text.

use once_cell::sync::Lazy;
use regex::Regex;

use quizforge_core::PromptMode;

/// Numbered question markers: "1.", "2)", "Q3.", "Q 4)".
static QUESTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(?:Q\s?)?\d{1,3}[.)]\s+\S").unwrap());

/// Lettered option markers: "A.", "b)", "(C)".
static OPTION_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)\(?[A-Da-d][.)]\s+\S").unwrap());

const JSON_SHAPE: &str = r#"{
    "questions": [
        {
            "question": "Question text here",
            "options": ["Option A", "Option B", "Option C", "Option D"],
            "correct": 0
        }
    ]
}"#;

pub struct PromptBuilder;

impl PromptBuilder {
    /// Resolve `Auto` to a concrete template for this document.
    pub fn resolve_mode(mode: PromptMode, document: &str) -> PromptMode {
        match mode {
            PromptMode::Auto if looks_like_quiz(document) => PromptMode::Reformat,
            PromptMode::Auto => PromptMode::Material,
            explicit => explicit,
        }
    }

    /// Build the prompt for `mode`. Concrete modes are used as given; `Auto`
    /// is resolved against the document here.
    pub fn build(mode: PromptMode, document: &str, question_count: usize) -> String {
        match mode {
            PromptMode::Material => Self::from_material(document, question_count),
            PromptMode::Reformat => Self::from_existing_quiz(document),
            PromptMode::Auto => match Self::resolve_mode(mode, document) {
                PromptMode::Reformat => Self::from_existing_quiz(document),
                _ => Self::from_material(document, question_count),
            },
        }
    }

    fn from_material(document: &str, question_count: usize) -> String {
        format!(
            "Based on the following document content, generate a quiz with {question_count} \
             multiple-choice questions.\n\
             Return ONLY a valid JSON object with this exact structure (no markdown, no extra text):\n\
             {JSON_SHAPE}\n\n\
             Rules:\n\
             - Every question has exactly 4 options\n\
             - \"correct\" is the zero-based index of the right option\n\
             - Questions must be answerable from the document alone\n\n\
             Document content:\n\
             {document}\n"
        )
    }

    fn from_existing_quiz(document: &str) -> String {
        format!(
            "You are a quiz formatter. Transform the following quiz content into a standardized \
             JSON format.\n\
             The input may contain questions in various formats (numbered, lettered, mixed formatting).\n\n\
             Extract and format into this EXACT JSON structure (no markdown, no extra text):\n\
             {JSON_SHAPE}\n\n\
             Rules:\n\
             - Remove question numbers (1., 2., Q1, etc.)\n\
             - Convert all answer choices to the options array (A, B, C, D or 1, 2, 3, 4)\n\
             - Set the correct answer index (0 for A/1st, 1 for B/2nd, etc.)\n\
             - If the correct answer is marked or indicated, use that index\n\
             - If no correct answer is marked, set correct: 0 as default\n\
             - Clean up formatting and extra whitespace\n\
             - Ensure exactly 4 options per question\n\n\
             Quiz content to transform:\n\
             {document}\n"
        )
    }
}

/// Heuristic: at least two numbered questions and one full set of lettered
/// options. Works on flattened PDF text as well as line-based text.
pub fn looks_like_quiz(document: &str) -> bool {
    QUESTION_MARKER.find_iter(document).count() >= 2
        && OPTION_MARKER.find_iter(document).count() >= 4
}
