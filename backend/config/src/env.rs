//! Environment handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` references inside YAML string values, resolved at load
//!   time (`$${VAR}` escapes to a literal `${VAR}`). Only uppercase
//!   `[A-Z_][A-Z0-9_]*` names are matched.
//! - Well-known variables (`QUIZFORGE_PORT`, `GEMINI_API_KEY`, ...) that
//!   override typed fields after parsing.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use tracing::debug;

use crate::schema::{ProviderName, QuizForgeConfig, ServerVariant};

/// `${VAR}` with an optional extra leading `$` marking an escape.
static ENV_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\$?)\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Substitute `${VAR}` references using the process environment.
pub fn resolve_env_vars(value: &Value) -> Result<Value> {
    resolve_env_vars_with(value, &std::env::vars().collect())
}

/// Substitute `${VAR}` references using a provided map.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                let child = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
                out.insert(k.clone(), substitute_value(v, env, &child)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains("${") {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let replaced = ENV_REF.replace_all(s, |caps: &Captures| {
        let name = &caps[2];
        if !caps[1].is_empty() {
            return format!("${{{name}}}");
        }
        match env.get(name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(replaced.into_owned())
}

/// Apply well-known environment overrides on top of the parsed file.
///
/// Credentials only fill an empty `llm.api_key` and only for the matching
/// provider; everything else replaces the file value.
pub fn apply_env_overrides(mut config: QuizForgeConfig, env: &HashMap<String, String>) -> Result<QuizForgeConfig> {
    let get = |key: &str| env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(bind) = get("QUIZFORGE_BIND") {
        config.server.bind = bind.to_string();
    }
    if let Some(port) = get("QUIZFORGE_PORT") {
        config.server.port = match port.parse() {
            Ok(p) => p,
            Err(_) => bail!("QUIZFORGE_PORT is not a valid port: {port}"),
        };
    }
    if let Some(variant) = get("QUIZFORGE_VARIANT") {
        config.server.variant = match variant.to_ascii_lowercase().as_str() {
            "ai" => ServerVariant::Ai,
            "stub" => ServerVariant::Stub,
            other => bail!("QUIZFORGE_VARIANT must be 'ai' or 'stub', got '{other}'"),
        };
    }
    if let Some(dir) = get("QUIZFORGE_UPLOAD_DIR") {
        config.uploads.dir = PathBuf::from(dir);
    }
    if let Some(provider) = get("QUIZFORGE_PROVIDER") {
        config.llm.provider = match provider.to_ascii_lowercase().as_str() {
            "gemini" => ProviderName::Gemini,
            "openrouter" => ProviderName::OpenRouter,
            "mock" => ProviderName::Mock,
            other => bail!("QUIZFORGE_PROVIDER '{other}' is not one of gemini, openrouter, mock"),
        };
    }
    if let Some(model) = get("QUIZFORGE_MODEL") {
        config.llm.model = Some(model.to_string());
    }
    if let Some(level) = get("RUST_LOG") {
        config.logging.level = level.to_string();
    }

    let key_var = match config.llm.provider {
        ProviderName::Gemini => Some("GEMINI_API_KEY"),
        ProviderName::OpenRouter => Some("OPENROUTER_API_KEY"),
        ProviderName::Mock => None,
    };
    let has_key = config.llm.api_key.as_deref().is_some_and(|k| !k.trim().is_empty());
    if let (Some(var), false) = (key_var, has_key) {
        if let Some(key) = get(var) {
            debug!(var, "Using API key from environment");
            config.llm.api_key = Some(key.to_string());
        }
    }

    Ok(config)
}

/// Collect all env var names referenced in a config value tree (for diagnostics).
pub fn collect_referenced_vars(value: &Value) -> Vec<String> {
    fn walk(value: &Value, out: &mut Vec<String>) {
        match value {
            Value::String(s) => out.extend(
                ENV_REF
                    .captures_iter(s)
                    .filter(|c| c[1].is_empty())
                    .map(|c| c[2].to_string()),
            ),
            Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
            Value::Object(map) => map.values().for_each(|v| walk(v, out)),
            _ => {}
        }
    }

    let mut vars = Vec::new();
    walk(value, &mut vars);
    vars.sort();
    vars.dedup();
    vars
}
