use std::path::PathBuf;

/// A document accepted by the upload receiver and written to disk.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub stored_path: PathBuf,
    /// Filename as sent by the client, unsanitized.
    pub original_name: String,
    pub declared_mime_type: String,
}
