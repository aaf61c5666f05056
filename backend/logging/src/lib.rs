//! Structured logging for QuizForge.
//!
//! Console output, optional daily-rotated JSON files, and scrubbing of
//! provider credentials from strings before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::{LOG_FILE_PREFIX, init_logger};
pub use redact::redact_sensitive_data;
