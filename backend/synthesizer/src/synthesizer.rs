use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use quizforge_core::{LlmProvider, LlmRequest, PromptMode, Quiz, QuizError};

use crate::completion::{parse_completion, strip_code_fences};
use crate::prompt::PromptBuilder;

/// Model and quiz-shape settings for one synthesizer.
#[derive(Debug, Clone)]
pub struct SynthesizerSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Questions requested by the material prompt.
    pub question_count: usize,
    /// Upper bound accepted from a completion.
    pub max_questions: usize,
}

impl Default for SynthesizerSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            max_tokens: 8192,
            temperature: 0.4,
            question_count: 5,
            max_questions: 50,
        }
    }
}

/// Turns extracted document text into a validated [`Quiz`] through a single
/// model call. No retries and no fallback quiz: any failure is returned as is.
pub struct QuizSynthesizer {
    provider: Arc<dyn LlmProvider>,
    settings: SynthesizerSettings,
}

impl QuizSynthesizer {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: SynthesizerSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn settings(&self) -> &SynthesizerSettings {
        &self.settings
    }

    /// Build the model request for `document`, resolving `Auto` first.
    pub fn build_request(&self, document: &str, mode: PromptMode) -> (PromptMode, LlmRequest) {
        let resolved = PromptBuilder::resolve_mode(mode, document);
        let request = LlmRequest {
            model: self.settings.model.clone(),
            system_prompt: String::new(),
            user_prompt: PromptBuilder::build(resolved, document, self.settings.question_count),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        (resolved, request)
    }

    #[instrument(skip(self, document), fields(provider = %self.provider.name(), mode = %mode))]
    pub async fn synthesize(
        &self,
        document: &str,
        filename: &str,
        mode: PromptMode,
    ) -> Result<Quiz, QuizError> {
        let (resolved, request) = self.build_request(document, mode);

        info!(
            resolved_mode = %resolved,
            model = %request.model,
            prompt_chars = request.user_prompt.len(),
            "Requesting quiz completion"
        );

        let response = self
            .provider
            .complete(&request)
            .await
            .map_err(|e| QuizError::Llm {
                provider: self.provider.name().to_string(),
                message: format!("{e:#}"),
            })?;

        info!(
            tokens = response.tokens_used,
            latency_ms = response.latency_ms,
            "Provider responded"
        );

        let cleaned = strip_code_fences(&response.content);
        let questions = match parse_completion(&cleaned, self.settings.max_questions) {
            Ok(questions) => questions,
            Err(e) => {
                error!(error = %e, cleaned_text = %cleaned, "Unusable completion");
                return Err(e);
            }
        };

        let quiz = Quiz::new(Utc::now().timestamp_millis(), filename, questions);
        info!(total_questions = quiz.total_questions, "Quiz synthesized");
        Ok(quiz)
    }
}
