//! HTTP mapping for pipeline failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quizforge_core::QuizError;
use quizforge_logging::redact_sensitive_data;
use serde::Serialize;
use tracing::{error, warn};

/// Body of every non-2xx response from `/generate`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A [`QuizError`] on its way out of a route handler.
#[derive(Debug)]
pub struct ApiError(pub QuizError);

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn body(&self) -> ErrorBody {
        let message = self.0.to_string();
        match &self.0 {
            e if e.is_client_error() => ErrorBody {
                error: message,
                details: None,
            },
            QuizError::Storage(_) => ErrorBody {
                error: "Failed to store document".to_string(),
                details: Some(message),
            },
            _ => ErrorBody {
                error: "Failed to generate quiz".to_string(),
                details: Some(message),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = self.body();
        let details = body.details.as_deref().map(redact_sensitive_data);

        if status.is_client_error() {
            warn!(status = status.as_u16(), error = %body.error, "Rejected upload");
        } else {
            error!(
                status = status.as_u16(),
                error = %body.error,
                details = details.as_deref().unwrap_or_default(),
                "Quiz request failed"
            );
        }

        (status, Json(body)).into_response()
    }
}
