//! `quizforge-config`: QuizForge runtime configuration management.
//!
//! Provides:
//! - Typed config schema (server, uploads, llm, quiz, stub, logging)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Well-known environment overrides
//! - Config redaction for safe logging/display
//! - Default value application and semantic validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, collect_referenced_vars, resolve_env_vars, resolve_env_vars_with,
    MissingEnvVarError,
};
pub use io::{default_config_path, load_raw_config, parse_yaml};
pub use redact::redact;
pub use schema::{
    LlmConfig, LoggingConfig, ProviderName, QuizConfig, QuizForgeConfig, ServerConfig,
    ServerVariant, StubConfig, UploadsConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Load a config file against the process environment.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path) -> Result<QuizForgeConfig> {
    load_and_prepare_with(path, &std::env::vars().collect()).await
}

/// Load, substitute `${VAR}` references, apply env overrides and defaults,
/// then validate. Warnings are logged; any error aborts the load.
pub async fn load_and_prepare_with(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<QuizForgeConfig> {
    let (config, report) = load_with_report(path, env).await?;

    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}

/// Same pipeline as [`load_and_prepare_with`], but hands the validation
/// report back instead of acting on it. Callers that start before logging
/// is set up use this to report problems themselves.
pub async fn load_with_report(
    path: &Path,
    env: &HashMap<String, String>,
) -> Result<(QuizForgeConfig, ValidationReport)> {
    let raw = load_raw_config(path).await?;
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: QuizForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;
    let config = apply_env_overrides(config, env)?;
    let config = apply_all_defaults(config);

    let report = validate(&config);
    Ok((config, report))
}

/// Config as a JSON tree with secrets masked, for display and logs.
pub fn redacted_snapshot(config: &QuizForgeConfig) -> Result<Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;
    Ok(redact(&value))
}
