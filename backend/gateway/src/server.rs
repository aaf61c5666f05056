//! Main HTTP Gateway Server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use quizforge_core::PromptMode;
use quizforge_synthesizer::QuizSynthesizer;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument};

use crate::generate;
use crate::health;
use crate::upload::UploadStore;

/// What answers an accepted upload.
#[derive(Clone)]
pub enum QuizBackend {
    /// Extract text and ask the model for a quiz.
    Synthesized(Arc<QuizSynthesizer>),
    /// Wait, then return the fixed three-question quiz.
    Placeholder { delay: Duration },
}

impl QuizBackend {
    pub fn variant(&self) -> &'static str {
        match self {
            QuizBackend::Synthesized(_) => "ai",
            QuizBackend::Placeholder { .. } => "stub",
        }
    }
}

/// Application state shared across routes. Immutable after startup.
#[derive(Clone)]
pub struct GatewayState {
    pub store: Arc<UploadStore>,
    pub backend: QuizBackend,
    /// Prompt mode used when a request carries no `mode` field.
    pub default_mode: PromptMode,
}

impl GatewayState {
    pub fn new(store: UploadStore, backend: QuizBackend, default_mode: PromptMode) -> Self {
        Self {
            store: Arc::new(store),
            backend,
            default_mode,
        }
    }
}

/// Build the application router.
pub fn router(state: GatewayState) -> Router {
    let body_limit = state.store.max_bytes();

    Router::new()
        .route("/generate", post(generate::generate_quiz))
        .route("/api/health", get(health::get_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Starts the Axum HTTP server and runs until Ctrl-C.
#[instrument(skip(state), fields(variant = state.backend.variant()))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let upload_dir = state.store.dir().display().to_string();
    let retain_uploads = state.store.retains_files();
    let app = router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, upload_dir = %upload_dir, retain_uploads, "QuizForge gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        // No signal handler: serve until the process is killed.
        Err(_) => std::future::pending::<()>().await,
    }
}
