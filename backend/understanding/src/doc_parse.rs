//! Document Parsing Pipeline
//!
//! Turns a stored upload into one flat string of text. Dispatch is by the
//! original filename's extension; only PDF and plain text have an extraction
//! path, everything else fails explicitly.

use std::fmt;
use std::path::{Path, PathBuf};

use lopdf::Document;
use quizforge_core::QuizError;
use tracing::{debug, info, instrument};

/// What the extractor knows how to read, decided by file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    /// Carries the lowercased extension (empty when there is none).
    Unsupported(String),
}

impl DocumentKind {
    /// Matches on the lowercased name's suffix, so dot-files such as
    /// `.pdf` count as PDFs.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            return DocumentKind::Pdf;
        }
        if lower.ends_with(".txt") {
            return DocumentKind::PlainText;
        }

        let ext = Path::new(&lower)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        DocumentKind::Unsupported(ext)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Pdf => f.write_str("pdf"),
            DocumentKind::PlainText => f.write_str("txt"),
            DocumentKind::Unsupported(ext) if ext.is_empty() => f.write_str("(no extension)"),
            DocumentKind::Unsupported(ext) => f.write_str(ext),
        }
    }
}

pub struct DocParser;

#[derive(Debug)]
pub struct DocumentMetadata {
    pub page_count: usize,
    pub extracted_text: String,
}

impl DocParser {
    /// Extract the text of a stored document.
    ///
    /// `original_name` decides the parser; `path` is where the bytes live.
    /// Whitespace-only results are rejected so that an empty prompt never
    /// reaches the model.
    #[instrument(skip_all, fields(file = %original_name))]
    pub async fn extract(path: &Path, original_name: &str) -> Result<String, QuizError> {
        let kind = DocumentKind::from_filename(original_name);
        debug!(kind = %kind, path = %path.display(), "Dispatching extractor");

        let text = match kind {
            DocumentKind::Pdf => Self::parse_pdf(path).await?.extracted_text,
            DocumentKind::PlainText => Self::read_text(path).await?,
            DocumentKind::Unsupported(_) => {
                return Err(QuizError::UnsupportedDocument(kind.to_string()));
            }
        };

        if text.trim().is_empty() {
            return Err(QuizError::EmptyDocument);
        }

        info!(chars = text.chars().count(), "Extracted document text");
        Ok(text)
    }

    /// Opens a PDF and extracts its text page by page, in page order.
    ///
    /// Each page is flattened to single-spaced words and pages are joined
    /// with one space.
    pub async fn parse_pdf(path: &Path) -> Result<DocumentMetadata, QuizError> {
        let owned: PathBuf = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::parse_pdf_blocking(&owned))
            .await
            .map_err(|e| QuizError::Extraction(format!("PDF worker failed: {e}")))?
    }

    fn parse_pdf_blocking(path: &Path) -> Result<DocumentMetadata, QuizError> {
        info!("Parsing PDF document: {}", path.display());

        let doc = Document::load(path)
            .map_err(|e| QuizError::Extraction(format!("failed to load PDF: {e}")))?;

        let pages = doc.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for page_num in pages.keys() {
            let raw = doc
                .extract_text(&[*page_num])
                .map_err(|e| QuizError::Extraction(format!("page {page_num}: {e}")))?;
            let flat = flatten_whitespace(&raw);
            if !flat.is_empty() {
                page_texts.push(flat);
            }
        }

        Ok(DocumentMetadata {
            page_count: pages.len(),
            extracted_text: page_texts.join(" "),
        })
    }

    /// Reads a plain-text document as UTF-8, unchanged.
    pub async fn read_text(path: &Path) -> Result<String, QuizError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| QuizError::Extraction(format!("failed to read {}: {e}", path.display())))?;

        String::from_utf8(bytes)
            .map_err(|_| QuizError::Extraction("text document is not valid UTF-8".into()))
    }
}

fn flatten_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
