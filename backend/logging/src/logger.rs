//! Structured Logger
//!
//! Wraps `tracing` with a human-readable console layer, an optional NDJSON
//! file layer with daily rotation, and `RUST_LOG`-based level control.

use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix for rotated logs: `<dir>/quizforge.log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "quizforge.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level`. A second call is a no-op, so tests and
/// subcommands may call this freely.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
