//! Fixed quiz served by the stub variant of `/generate`.
//!
//! Lets clients exercise the API contract without a model call. The content
//! never depends on the uploaded document.

use chrono::Utc;

use quizforge_core::{Quiz, QuizQuestion};

const PLACEHOLDER_QUESTIONS: [(&str, [&str; 4], usize); 3] = [
    (
        "What is the main topic of this document?",
        ["Science", "History", "Mathematics", "Literature"],
        0,
    ),
    (
        "Which of the following is a key concept mentioned?",
        ["Concept A", "Concept B", "Concept C", "Concept D"],
        1,
    ),
    (
        "What conclusion does the document reach?",
        ["Conclusion 1", "Conclusion 2", "Conclusion 3", "Conclusion 4"],
        2,
    ),
];

/// The hard-coded three-question quiz, titled after `filename`.
pub fn placeholder_quiz(filename: &str) -> Quiz {
    let questions = PLACEHOLDER_QUESTIONS
        .iter()
        .map(|(text, options, correct)| QuizQuestion {
            question_text: (*text).to_string(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            correct_option_index: *correct,
        })
        .collect();

    Quiz::new(Utc::now().timestamp_millis(), filename, questions)
}
