//! Wiring from a loaded config to the running pieces.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use quizforge_config::{LlmConfig, ProviderName, QuizForgeConfig, ServerVariant};
use quizforge_gateway::{GatewayState, QuizBackend, UploadStore};
use quizforge_synthesizer::{create_provider, ProviderKind, QuizSynthesizer, SynthesizerSettings};
use tracing::info;

/// Translate the `llm` section into a provider recipe.
pub fn provider_kind(llm: &LlmConfig) -> Result<ProviderKind> {
    let api_key = || -> Result<String> {
        llm.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .with_context(|| format!("provider '{}' needs an API key", llm.provider.as_str()))
    };

    Ok(match llm.provider {
        ProviderName::Gemini => ProviderKind::Gemini {
            api_key: api_key()?,
            base_url: llm.base_url.clone(),
        },
        ProviderName::OpenRouter => ProviderKind::OpenRouter {
            api_key: api_key()?,
            base_url: llm.base_url.clone(),
        },
        ProviderName::Mock => ProviderKind::Mock {
            response: llm.mock_response.clone(),
        },
    })
}

pub fn build_synthesizer(config: &QuizForgeConfig) -> Result<QuizSynthesizer> {
    let Some(model) = config.llm.model.clone() else {
        bail!("no model configured for provider '{}'", config.llm.provider.as_str());
    };

    let provider = create_provider(provider_kind(&config.llm)?);
    info!(provider = provider.name(), model = %model, "Model provider ready");

    Ok(QuizSynthesizer::new(
        provider,
        SynthesizerSettings {
            model,
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            question_count: config.quiz.question_count,
            max_questions: config.quiz.max_questions,
        },
    ))
}

/// Build the immutable gateway state for the configured variant.
pub fn build_state(config: &QuizForgeConfig) -> Result<GatewayState> {
    let store = UploadStore::new(
        config.uploads.dir.clone(),
        config.uploads.max_bytes,
        config.uploads.retain,
    );

    let backend = match config.server.variant {
        ServerVariant::Ai => QuizBackend::Synthesized(Arc::new(build_synthesizer(config)?)),
        ServerVariant::Stub => QuizBackend::Placeholder {
            delay: Duration::from_millis(config.stub.delay_ms),
        },
    };

    Ok(GatewayState::new(store, backend, config.quiz.prompt_mode))
}
