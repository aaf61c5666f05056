//! `POST /generate`: document upload in, quiz out.

use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use quizforge_core::{PromptMode, Quiz, QuizError, UploadedFile};
use quizforge_synthesizer::{QuizSynthesizer, placeholder_quiz};
use quizforge_understanding::DocParser;
use serde::Serialize;
use tracing::{Span, info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::{GatewayState, QuizBackend};
use crate::upload::receive_document;

/// Success envelope shared by both backends.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// The client's filename, as sent.
    pub filename: String,
    pub quiz: Quiz,
}

/// Handler for `POST /generate`.
#[instrument(skip_all, fields(request_id = %Uuid::new_v4(), file = tracing::field::Empty))]
pub async fn generate_quiz(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let upload = receive_document(multipart, &state.store).await?;
    let file = upload.file;
    Span::current().record("file", file.original_name.as_str());

    let result = match &state.backend {
        QuizBackend::Synthesized(synthesizer) => {
            let mode = upload.mode.unwrap_or(state.default_mode);
            synthesize(synthesizer, &file, mode).await
        }
        QuizBackend::Placeholder { delay } => {
            tokio::time::sleep(*delay).await;
            Ok(placeholder_quiz(&file.original_name))
        }
    };

    state.store.release(&file.stored_path).await;

    let quiz = result?;
    info!(quiz_id = quiz.id, total_questions = quiz.total_questions, "Quiz ready");

    Ok(Json(GenerateResponse {
        success: true,
        filename: file.original_name,
        quiz,
    }))
}

async fn synthesize(
    synthesizer: &QuizSynthesizer,
    file: &UploadedFile,
    mode: PromptMode,
) -> Result<Quiz, QuizError> {
    let text = DocParser::extract(&file.stored_path, &file.original_name).await?;
    synthesizer.synthesize(&text, &file.original_name, mode).await
}
