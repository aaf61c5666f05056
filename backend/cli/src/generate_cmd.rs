//! `quizforge generate`: run extraction and synthesis on a local file.

use std::path::Path;

use anyhow::{bail, Context, Result};
use quizforge_config::QuizForgeConfig;
use quizforge_core::{PromptMode, QuizError};
use quizforge_understanding::{detect_mime_type, is_allowed_upload_type, DocParser};
use serde_json::json;

use crate::app::build_synthesizer;

pub async fn run(config: &QuizForgeConfig, file: &Path, mode: Option<PromptMode>) -> Result<()> {
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", file.display()))?;

    let mime = detect_mime_type(file);
    if !is_allowed_upload_type(mime) {
        bail!(QuizError::UnsupportedMimeType(mime.to_string()));
    }

    let synthesizer = build_synthesizer(config)?;
    let text = DocParser::extract(file, filename).await?;
    let quiz = synthesizer
        .synthesize(&text, filename, mode.unwrap_or(config.quiz.prompt_mode))
        .await?;

    let envelope = json!({
        "success": true,
        "filename": filename,
        "quiz": quiz,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
