//! Completion post-processing: fence stripping, JSON parsing and schema
//! validation of the model's answer.
//!
//! The completion is untrusted input. A syntactically valid JSON object is
//! not enough; every question is checked before it reaches the client.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use quizforge_core::{QuizError, QuizQuestion, OPTIONS_PER_QUESTION};

/// Opening or closing Markdown fence, with or without a `json` tag.
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```(?:json)?[ \t]*\r?\n?").unwrap());

#[derive(Debug, Deserialize)]
struct RawCompletion {
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct: i64,
}

/// Remove Markdown code fences and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").trim().to_string()
}

/// Parse a cleaned completion into validated questions.
///
/// Non-JSON text yields [`QuizError::MalformedCompletion`]; JSON of the wrong
/// shape or with out-of-range values yields [`QuizError::InvalidQuiz`].
pub fn parse_completion(cleaned: &str, max_questions: usize) -> Result<Vec<QuizQuestion>, QuizError> {
    let value: Value = serde_json::from_str(cleaned).map_err(|_| QuizError::MalformedCompletion)?;

    let raw: RawCompletion = serde_json::from_value(value)
        .map_err(|e| QuizError::InvalidQuiz(format!("unexpected shape: {e}")))?;

    validate(raw.questions, max_questions)
}

fn validate(raw: Vec<RawQuestion>, max_questions: usize) -> Result<Vec<QuizQuestion>, QuizError> {
    if raw.is_empty() {
        return Err(QuizError::InvalidQuiz("no questions returned".into()));
    }
    if raw.len() > max_questions {
        return Err(QuizError::InvalidQuiz(format!(
            "{} questions returned, at most {max_questions} allowed",
            raw.len()
        )));
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, q)| validate_question(i + 1, q))
        .collect()
}

fn validate_question(number: usize, raw: RawQuestion) -> Result<QuizQuestion, QuizError> {
    let question_text = raw.question.trim().to_string();
    if question_text.is_empty() {
        return Err(QuizError::InvalidQuiz(format!("question {number} has no text")));
    }

    if raw.options.len() != OPTIONS_PER_QUESTION {
        return Err(QuizError::InvalidQuiz(format!(
            "question {number} has {} options, expected {OPTIONS_PER_QUESTION}",
            raw.options.len()
        )));
    }

    let options: Vec<String> = raw.options.iter().map(|o| o.trim().to_string()).collect();
    if options.iter().any(String::is_empty) {
        return Err(QuizError::InvalidQuiz(format!("question {number} has an empty option")));
    }

    let correct_option_index = usize::try_from(raw.correct)
        .ok()
        .filter(|idx| *idx < OPTIONS_PER_QUESTION)
        .ok_or_else(|| {
            QuizError::InvalidQuiz(format!(
                "question {number} has correct index {} outside 0..{OPTIONS_PER_QUESTION}",
                raw.correct
            ))
        })?;

    Ok(QuizQuestion {
        question_text,
        options,
        correct_option_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPITAL: &str = r#"{"questions":[{"question":"What is the capital of France?","options":["Paris","Lyon","Nice","Lille"],"correct":0}]}"#;

    #[test]
    fn strips_json_fences() {
        let fenced = format!("```json\n{CAPITAL}\n```");
        assert_eq!(strip_code_fences(&fenced), CAPITAL);
    }

    #[test]
    fn strips_bare_and_uppercase_fences() {
        assert_eq!(strip_code_fences("```\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fences("```JSON\r\n{}\r\n```"), "{}");
    }

    #[test]
    fn leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences(&format!("  {CAPITAL}\n")), CAPITAL);
    }

    #[test]
    fn parses_a_well_formed_completion() {
        let questions = parse_completion(CAPITAL, 50).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question_text, "What is the capital of France?");
        assert_eq!(questions[0].options[0], "Paris");
        assert_eq!(questions[0].correct_option_index, 0);
    }

    #[test]
    fn non_json_is_malformed() {
        let err = parse_completion("Sure! Here is your quiz: 1. ...", 50).unwrap_err();
        assert!(matches!(err, QuizError::MalformedCompletion));
        assert!(err.to_string().contains("JSON"));
    }

    #[test]
    fn missing_fields_fail_validation() {
        let err = parse_completion(r#"{"questions":[{"question":"Q?","options":["a","b","c","d"]}]}"#, 50)
            .unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuiz(_)));

        let err = parse_completion(r#"{"quiz":[]}"#, 50).unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuiz(_)));
    }

    #[test]
    fn three_options_are_rejected() {
        let err = parse_completion(
            r#"{"questions":[{"question":"Q?","options":["a","b","c"],"correct":0}]}"#,
            50,
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 options"));
    }

    #[test]
    fn out_of_range_correct_index_is_rejected() {
        for bad in ["4", "-1"] {
            let json = format!(
                r#"{{"questions":[{{"question":"Q?","options":["a","b","c","d"],"correct":{bad}}}]}}"#
            );
            let err = parse_completion(&json, 50).unwrap_err();
            assert!(matches!(err, QuizError::InvalidQuiz(_)), "correct={bad}");
        }
    }

    #[test]
    fn empty_and_oversized_question_lists_are_rejected() {
        assert!(matches!(
            parse_completion(r#"{"questions":[]}"#, 50),
            Err(QuizError::InvalidQuiz(_))
        ));

        let two = r#"{"questions":[
            {"question":"A?","options":["1","2","3","4"],"correct":1},
            {"question":"B?","options":["1","2","3","4"],"correct":2}
        ]}"#;
        assert!(matches!(parse_completion(two, 1), Err(QuizError::InvalidQuiz(_))));
        assert_eq!(parse_completion(two, 2).unwrap().len(), 2);
    }

    #[test]
    fn whitespace_is_trimmed_and_blank_options_rejected() {
        let padded = r#"{"questions":[{"question":"  Q?  ","options":[" a ","b","c","d"],"correct":3}]}"#;
        let q = &parse_completion(padded, 50).unwrap()[0];
        assert_eq!(q.question_text, "Q?");
        assert_eq!(q.options[0], "a");

        let blank = r#"{"questions":[{"question":"Q?","options":["a"," ","c","d"],"correct":0}]}"#;
        assert!(matches!(parse_completion(blank, 50), Err(QuizError::InvalidQuiz(_))));
    }
}
