//! Config validation: semantic checks with user-friendly error messages.

use std::net::IpAddr;

use thiserror::Error;

use crate::schema::{QuizForgeConfig, ServerVariant};

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &QuizForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_server(config, &mut report);
    validate_uploads(config, &mut report);
    validate_llm(config, &mut report);
    validate_quiz(config, &mut report);
    validate_stub(config, &mut report);
    report
}

fn validate_server(config: &QuizForgeConfig, report: &mut ValidationReport) {
    let server = &config.server;
    if server.bind.parse::<IpAddr>().is_err() {
        report.error(
            "server.bind",
            format!("'{}' is not an IP address (e.g. 0.0.0.0 or 127.0.0.1)", server.bind),
        );
    }
    if server.port == 0 {
        report.error("server.port", "Port must be between 1 and 65535");
    } else if server.port < 1024 && server.port != 80 && server.port != 443 {
        report.warn(
            "server.port",
            format!("Port {} requires elevated privileges; consider using a port >= 1024", server.port),
        );
    }
}

fn validate_uploads(config: &QuizForgeConfig, report: &mut ValidationReport) {
    if config.uploads.dir.as_os_str().is_empty() {
        report.error("uploads.dir", "Upload directory cannot be empty");
    }
    if config.uploads.max_bytes == 0 {
        report.error("uploads.max_bytes", "max_bytes must be > 0");
    }
}

/// A remote provider without a key is fatal for the AI variant only; the
/// stub never calls the model.
fn validate_llm(config: &QuizForgeConfig, report: &mut ValidationReport) {
    let llm = &config.llm;
    let missing_key = llm.api_key.as_deref().map_or(true, |k| k.trim().is_empty());

    if llm.provider.is_remote() && missing_key {
        let message = format!(
            "No API key for provider '{}'; set llm.api_key or {}",
            llm.provider.as_str(),
            match llm.provider.as_str() {
                "openrouter" => "OPENROUTER_API_KEY",
                _ => "GEMINI_API_KEY",
            }
        );
        match config.server.variant {
            ServerVariant::Ai => report.error("llm.api_key", message),
            ServerVariant::Stub => report.warn("llm.api_key", message),
        }
    }

    if llm.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
        report.error("llm.model", "Model id cannot be empty");
    }
    if llm.max_tokens == 0 {
        report.error("llm.max_tokens", "max_tokens must be > 0");
    }
    if !(0.0..=2.0).contains(&llm.temperature) {
        report.error("llm.temperature", "temperature must be between 0.0 and 2.0");
    }
    if let Some(url) = &llm.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("llm.base_url", format!("'{url}' is not an http(s) URL"));
        }
    }
}

fn validate_quiz(config: &QuizForgeConfig, report: &mut ValidationReport) {
    let quiz = &config.quiz;
    if quiz.question_count == 0 {
        report.error("quiz.question_count", "question_count must be >= 1");
    }
    if quiz.max_questions == 0 {
        report.error("quiz.max_questions", "max_questions must be >= 1");
    }
    if quiz.question_count > quiz.max_questions {
        report.error(
            "quiz.question_count",
            format!(
                "question_count ({}) exceeds max_questions ({})",
                quiz.question_count, quiz.max_questions
            ),
        );
    }
}

fn validate_stub(config: &QuizForgeConfig, report: &mut ValidationReport) {
    if config.stub.delay_ms > 60_000 {
        report.warn("stub.delay_ms", "Stub delay above one minute will likely hit client timeouts");
    }
}
