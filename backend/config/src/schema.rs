//! QuizForge runtime configuration schema.
//!
//! Every section has a complete default, so an empty or missing YAML file is
//! a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use quizforge_core::PromptMode;

use crate::defaults::{
    DEFAULT_BIND, DEFAULT_LOG_LEVEL, DEFAULT_MAX_QUESTIONS, DEFAULT_MAX_TOKENS,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_QUESTION_COUNT, DEFAULT_STUB_DELAY_MS,
    DEFAULT_TEMPERATURE, DEFAULT_UPLOAD_DIR,
};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizForgeConfig {
    pub server: ServerConfig,
    pub uploads: UploadsConfig,
    pub llm: LlmConfig,
    pub quiz: QuizConfig,
    pub stub: StubConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// Which implementation answers `POST /generate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerVariant {
    #[default]
    Ai,
    Stub,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub variant: ServerVariant,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            port: DEFAULT_PORT,
            variant: ServerVariant::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Uploads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    /// Directory stored uploads are written to.
    pub dir: PathBuf,
    /// Request body limit for `/generate`.
    pub max_bytes: usize,
    /// Keep stored files after the response has been produced.
    pub retain: bool,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            retain: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Gemini,
    OpenRouter,
    Mock,
}

impl ProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderName::Gemini => "gemini",
            ProviderName::OpenRouter => "openrouter",
            ProviderName::Mock => "mock",
        }
    }

    /// Whether calls leave the process and need a credential.
    pub fn is_remote(&self) -> bool {
        !matches!(self, ProviderName::Mock)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderName,
    /// Filled per provider by `apply_all_defaults` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Canned completion for the `mock` provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_response: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderName::default(),
            model: None,
            api_key: None,
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            mock_response: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Quiz shape, stub, logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub prompt_mode: PromptMode,
    pub question_count: usize,
    pub max_questions: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            prompt_mode: PromptMode::default(),
            question_count: DEFAULT_QUESTION_COUNT,
            max_questions: DEFAULT_MAX_QUESTIONS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StubConfig {
    /// Artificial latency before the placeholder quiz is returned.
    pub delay_ms: u64,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_STUB_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for daily-rotated JSON log files; console only when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            dir: None,
        }
    }
}
