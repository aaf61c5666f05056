//! MIME type detection and the upload allow-list.

use std::path::Path;

/// Declared content types the upload receiver accepts.
pub const ALLOWED_UPLOAD_TYPES: [&str; 4] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "pdf"          => "application/pdf",
        "doc"          => "application/msword",
        "docx"         => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "text" => "text/plain",
        "md"           => "text/markdown",
        "html" | "htm" => "text/html",
        "json"         => "application/json",
        "csv"          => "text/csv",
        "rtf"          => "application/rtf",
        "odt"          => "application/vnd.oasis.opendocument.text",
        "png"          => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _              => "application/octet-stream",
    }
}

/// Whether a declared content type is on the allow-list.
///
/// Parameters such as `; charset=utf-8` are ignored and the comparison is
/// case-insensitive.
pub fn is_allowed_upload_type(declared: &str) -> bool {
    let essence = declared.split(';').next().unwrap_or("").trim();
    ALLOWED_UPLOAD_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}
