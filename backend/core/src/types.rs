use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// Every question carries exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(rename = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    #[serde(rename = "correct")]
    pub correct_option_index: usize,
}

/// A finished quiz as returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Creation timestamp in milliseconds since the Unix epoch.
    pub id: i64,
    pub title: String,
    pub questions: Vec<QuizQuestion>,
    pub total_questions: usize,
}

impl Quiz {
    /// Assemble a quiz for `filename`. `total_questions` always mirrors the
    /// question list.
    pub fn new(id: i64, filename: &str, questions: Vec<QuizQuestion>) -> Self {
        Self {
            id,
            title: Self::title_for(filename),
            total_questions: questions.len(),
            questions,
        }
    }

    pub fn title_for(filename: &str) -> String {
        format!("Quiz for {filename}")
    }
}

/// Which prompt template the synthesizer issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Generate new questions from raw study material.
    Material,
    /// Reformat an existing quiz into the standard shape.
    #[default]
    Reformat,
    /// Pick one of the above by looking at the document text.
    Auto,
}

impl PromptMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::Material => "material",
            PromptMode::Reformat => "reformat",
            PromptMode::Auto => "auto",
        }
    }
}

impl fmt::Display for PromptMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromptMode {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "material" => Ok(PromptMode::Material),
            "reformat" => Ok(PromptMode::Reformat),
            "auto" => Ok(PromptMode::Auto),
            other => Err(QuizError::InvalidMode(other.to_string())),
        }
    }
}
