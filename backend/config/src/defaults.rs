//! Config defaults: constants for every section plus the provider-dependent
//! defaults that can only be decided after the file has been read.

use crate::schema::{ProviderName, QuizForgeConfig};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

/// 25 MiB; axum's built-in 2 MiB limit is too small for lecture PDFs.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const DEFAULT_MAX_QUESTIONS: usize = 50;

pub const DEFAULT_STUB_DELAY_MS: u64 = 2000;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default model id for a provider.
pub fn default_model(provider: ProviderName) -> &'static str {
    match provider {
        ProviderName::Gemini => "gemini-2.5-flash",
        ProviderName::OpenRouter => "google/gemini-2.5-flash",
        ProviderName::Mock => "mock",
    }
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: QuizForgeConfig) -> QuizForgeConfig {
    apply_model_defaults(config)
}

/// Pick the provider's default model when none is configured.
fn apply_model_defaults(mut config: QuizForgeConfig) -> QuizForgeConfig {
    let blank = config.llm.model.as_deref().map(str::trim).map_or(true, str::is_empty);
    if blank {
        config.llm.model = Some(default_model(config.llm.provider).to_string());
    }
    config
}
