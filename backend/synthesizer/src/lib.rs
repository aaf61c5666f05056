pub mod completion;
pub mod placeholder;
pub mod prompt;
pub mod providers;
pub mod synthesizer;

pub use completion::{parse_completion, strip_code_fences};
pub use placeholder::placeholder_quiz;
pub use prompt::{looks_like_quiz, PromptBuilder};
pub use providers::{create_provider, ProviderKind};
pub use synthesizer::{QuizSynthesizer, SynthesizerSettings};
