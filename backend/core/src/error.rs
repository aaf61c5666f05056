use thiserror::Error;

/// Every way a quiz request can fail, from upload to validated quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("No document uploaded")]
    NoDocument,

    #[error("Only PDF, DOC, DOCX, and TXT files are allowed")]
    UnsupportedMimeType(String),

    #[error("Only one document may be uploaded per request")]
    MultipleDocuments,

    #[error("unknown prompt mode '{0}'; use material, reformat or auto")]
    InvalidMode(String),

    #[error("malformed upload: {0}")]
    MalformedUpload(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("unsupported document type '{0}'")]
    UnsupportedDocument(String),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("document contains no extractable text")]
    EmptyDocument,

    #[error("LLM provider error ({provider}): {message}")]
    Llm { provider: String, message: String },

    #[error("Failed to parse AI response as JSON")]
    MalformedCompletion,

    #[error("AI response failed quiz validation: {0}")]
    InvalidQuiz(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuizError {
    /// True for errors caused by what the client sent, as opposed to
    /// failures further down the pipeline.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QuizError::NoDocument
                | QuizError::UnsupportedMimeType(_)
                | QuizError::MultipleDocuments
                | QuizError::InvalidMode(_)
                | QuizError::MalformedUpload(_)
        )
    }
}
