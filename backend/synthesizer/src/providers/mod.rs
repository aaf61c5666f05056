pub mod gemini;
pub mod mock;
pub mod openrouter;

use std::sync::Arc;

use quizforge_core::LlmProvider;

use self::gemini::GeminiProvider;
use self::mock::MockProvider;
use self::openrouter::OpenRouterProvider;

/// Which backend to build, with the settings it needs.
#[derive(Debug, Clone)]
pub enum ProviderKind {
    Gemini { api_key: String, base_url: Option<String> },
    OpenRouter { api_key: String, base_url: Option<String> },
    Mock { response: Option<String> },
}

/// Build the provider once at startup; the synthesizer shares it across requests.
pub fn create_provider(kind: ProviderKind) -> Arc<dyn LlmProvider> {
    match kind {
        ProviderKind::Gemini { api_key, base_url } => {
            let provider = GeminiProvider::new(api_key);
            Arc::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            })
        }
        ProviderKind::OpenRouter { api_key, base_url } => {
            let provider = OpenRouterProvider::new(api_key);
            Arc::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            })
        }
        ProviderKind::Mock { response } => {
            let provider = MockProvider::new("mock");
            Arc::new(match response {
                Some(r) => provider.with_response(r),
                None => provider,
            })
        }
    }
}
