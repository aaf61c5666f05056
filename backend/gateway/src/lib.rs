//! QuizForge Gateway HTTP API Server
//!
//! Serves `POST /generate` (document upload to quiz) and `GET /api/health`.

pub mod error;
pub mod generate;
pub mod health;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use generate::GenerateResponse;
pub use server::{router, start_server, GatewayState, QuizBackend};
pub use upload::{sanitize_filename, UploadStore};
