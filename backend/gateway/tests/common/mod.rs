#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, Response},
};
use quizforge_core::PromptMode;
use quizforge_gateway::{GatewayState, QuizBackend, UploadStore};
use quizforge_synthesizer::providers::mock::MockProvider;
use quizforge_synthesizer::{QuizSynthesizer, SynthesizerSettings};
use serde_json::Value;

pub const BOUNDARY: &str = "quizforge-test-boundary";
pub const MAX_BYTES: usize = 1024 * 1024;

/// One part of a hand-built multipart body.
pub enum Part<'a> {
    File {
        name: &'a str,
        filename: &'a str,
        content_type: Option<&'a str>,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// A `document` file part.
pub fn document<'a>(filename: &'a str, content_type: &'a str, data: &'a [u8]) -> Part<'a> {
    Part::File {
        name: "document",
        filename,
        content_type: Some(content_type),
        data,
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                filename,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n")
                        .as_bytes(),
                );
                if let Some(ct) = content_type {
                    body.extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
                }
                body.extend_from_slice(b"\r\n");
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn generate_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(multipart_body(parts)))
        .expect("request build should succeed")
}

pub fn upload_dir(root: &Path) -> PathBuf {
    root.join("uploads")
}

/// Files currently in the uploads directory (empty if it was never created).
pub fn stored_files(root: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(upload_dir(root)) {
        Ok(entries) => entries.map(|e| e.expect("dir entry").path()).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn ai_state(root: &Path, provider: Arc<MockProvider>, retain: bool) -> GatewayState {
    let synthesizer = QuizSynthesizer::new(provider, SynthesizerSettings::default());
    GatewayState::new(
        UploadStore::new(upload_dir(root), MAX_BYTES, retain),
        QuizBackend::Synthesized(Arc::new(synthesizer)),
        PromptMode::Reformat,
    )
}

pub fn stub_state(root: &Path) -> GatewayState {
    GatewayState::new(
        UploadStore::new(upload_dir(root), MAX_BYTES, true),
        QuizBackend::Placeholder {
            delay: Duration::ZERO,
        },
        PromptMode::Reformat,
    )
}

pub async fn json_body(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
