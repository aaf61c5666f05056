//! Locating and reading the YAML config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, info};

/// Config file looked up in the working directory.
const CONFIG_FILE_NAME: &str = "quizforge.yaml";

/// Resolve which config file to read.
/// Priority: `QUIZFORGE_CONFIG` env > `./quizforge.yaml` > `<config dir>/quizforge/config.yaml`.
///
/// The returned path may not exist; [`load_raw_config`] treats that as an
/// empty config.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("QUIZFORGE_CONFIG") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }

    dirs::config_dir()
        .map(|dir| dir.join("quizforge").join("config.yaml"))
        .filter(|p| p.exists())
        .unwrap_or(local)
}

/// Read the config file into an untyped JSON tree, ready for `${VAR}`
/// substitution.
///
/// Returns an empty object if the file doesn't exist, so every default
/// applies.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value = parse_yaml(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

/// An empty document parses to an empty object rather than `null`.
pub fn parse_yaml(raw: &str) -> Result<Value> {
    let value: Value = serde_yaml::from_str(raw)?;
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}
