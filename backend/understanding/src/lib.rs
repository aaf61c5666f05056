//! Document understanding: turn a stored upload into plain text.

pub mod doc_parse;
pub mod mime_detect;

pub use doc_parse::{DocParser, DocumentKind, DocumentMetadata};
pub use mime_detect::{ALLOWED_UPLOAD_TYPES, detect_mime_type, is_allowed_upload_type};
