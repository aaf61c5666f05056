pub mod document;
pub mod error;
pub mod traits;
pub mod types;

pub use document::UploadedFile;
pub use error::QuizError;
pub use traits::{LlmProvider, LlmRequest, LlmResponse};
pub use types::{PromptMode, Quiz, QuizQuestion, OPTIONS_PER_QUESTION};
