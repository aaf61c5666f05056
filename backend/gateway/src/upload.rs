//! Document upload receiver.
//!
//! Reads the multipart body, enforces the MIME allow-list, and writes the
//! accepted file to the uploads directory as `<millis>-<name>`, never
//! overwriting an existing upload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use chrono::Utc;
use quizforge_core::{PromptMode, QuizError, UploadedFile};
use quizforge_understanding::is_allowed_upload_type;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Multipart field carrying the document.
pub const DOCUMENT_FIELD: &str = "document";
/// Optional text field selecting the prompt mode.
pub const MODE_FIELD: &str = "mode";

/// File parts without a `Content-Type` header are text per RFC 7578.
const DEFAULT_PART_CONTENT_TYPE: &str = "text/plain";

/// Exclusive-create attempts before storage gives up.
const MAX_NAME_ATTEMPTS: usize = 8;

/// Where and how uploads are persisted.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
    retain: bool,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize, retain: bool) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
            retain,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn retains_files(&self) -> bool {
        self.retain
    }

    /// Write `data` under a timestamped, sanitized name.
    ///
    /// Files are created exclusively. When `<millis>-<name>` is already
    /// taken, a short random segment is inserted: `<millis>-<tag>-<name>`.
    pub async fn persist(&self, original_name: &str, data: &[u8]) -> Result<PathBuf, QuizError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| QuizError::Storage(format!("{}: {e}", self.dir.display())))?;

        let millis = Utc::now().timestamp_millis();
        let name = sanitize_filename(original_name);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let stored_name = if attempt == 0 {
                format!("{millis}-{name}")
            } else {
                let tag = Uuid::new_v4().simple().to_string();
                format!("{millis}-{}-{name}", &tag[..8])
            };
            let path = self.dir.join(stored_name);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Upload name taken, retrying");
                    continue;
                }
                Err(e) => return Err(QuizError::Storage(format!("{}: {e}", path.display()))),
            };

            let written = match file.write_all(data).await {
                Ok(()) => file.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = written {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(QuizError::Storage(format!("{}: {e}", path.display())));
            }

            info!(path = %path.display(), bytes = data.len(), "Stored upload");
            return Ok(path);
        }

        Err(QuizError::Storage(format!(
            "no free name for '{name}' in {} after {MAX_NAME_ATTEMPTS} attempts",
            self.dir.display()
        )))
    }

    /// Remove a stored upload unless the store retains files.
    pub async fn release(&self, path: &Path) {
        if self.retain {
            return;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "Removed upload"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove upload"),
        }
    }
}

/// Reduce a client filename to a safe final path component.
///
/// Both `/` and `\` count as separators. Characters outside
/// `[A-Za-z0-9._ -]` become `_`; names that would still resolve to a
/// directory fall back to `document`.
pub fn sanitize_filename(original: &str) -> String {
    let last = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = last
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | ' ' | '-' => c,
            _ => '_',
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "document".to_string(),
        _ => cleaned,
    }
}

/// The outcome of reading one `/generate` request body.
#[derive(Debug)]
pub struct ReceivedUpload {
    pub file: UploadedFile,
    /// Per-request override of the configured prompt mode.
    pub mode: Option<PromptMode>,
}

struct PendingDocument {
    original_name: String,
    content_type: String,
    data: Bytes,
}

/// Read the multipart body and persist the single accepted document.
///
/// Everything is validated before anything touches the disk, so rejected
/// requests leave the uploads directory unchanged.
pub async fn receive_document(
    multipart: Result<Multipart, MultipartRejection>,
    store: &UploadStore,
) -> Result<ReceivedUpload, QuizError> {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            debug!(reason = %rejection, "Request body is not multipart");
            return Err(QuizError::NoDocument);
        }
    };

    let mut document: Option<PendingDocument> = None;
    let mut mode: Option<PromptMode> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QuizError::MalformedUpload(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(DOCUMENT_FIELD) => {
                let Some(original_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
                else {
                    debug!("Ignoring non-file document field");
                    continue;
                };
                if document.is_some() {
                    return Err(QuizError::MultipleDocuments);
                }

                let content_type = field
                    .content_type()
                    .unwrap_or(DEFAULT_PART_CONTENT_TYPE)
                    .to_string();
                if !is_allowed_upload_type(&content_type) {
                    return Err(QuizError::UnsupportedMimeType(content_type));
                }

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| QuizError::MalformedUpload(e.body_text()))?;
                document = Some(PendingDocument {
                    original_name,
                    content_type,
                    data,
                });
            }
            Some(MODE_FIELD) => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| QuizError::MalformedUpload(e.body_text()))?;
                mode = Some(raw.trim().parse()?);
            }
            other => debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let pending = document.ok_or(QuizError::NoDocument)?;
    let stored_path = store.persist(&pending.original_name, &pending.data).await?;

    Ok(ReceivedUpload {
        file: UploadedFile {
            stored_path,
            original_name: pending.original_name,
            declared_mime_type: pending.content_type,
        },
        mode,
    })
}
