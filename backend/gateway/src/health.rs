//! Gateway Health API

use axum::{Json, extract::State};
use serde::Serialize;

use crate::server::GatewayState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// `ai` or `stub`.
    pub variant: &'static str,
}

/// Handler for `GET /api/health`
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        service: "quizforge",
        version: env!("CARGO_PKG_VERSION"),
        variant: state.backend.variant(),
    })
}
