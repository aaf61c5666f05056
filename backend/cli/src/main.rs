mod app;
mod generate_cmd;
mod status_cmd;

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use quizforge_config::{
    default_config_path, load_with_report, redacted_snapshot, QuizForgeConfig,
};
use quizforge_core::PromptMode;

#[derive(Parser)]
#[command(name = "quizforge")]
#[command(about = "QuizForge: turn uploaded documents into multiple-choice quizzes")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $QUIZFORGE_CONFIG, then ./quizforge.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Answer every upload with the placeholder quiz
        #[arg(long)]
        stub: bool,
    },
    /// Generate a quiz from a local document and print it as JSON
    Generate {
        file: PathBuf,
        /// Prompt mode: material, reformat or auto
        #[arg(short, long)]
        mode: Option<PromptMode>,
    },
    /// Print the effective configuration with secrets masked
    Config,
    /// Show whether a local server is up
    Status {
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let mut env: HashMap<String, String> = std::env::vars().collect();
    if matches!(cli.command, Commands::Serve { stub: true, .. }) {
        // Validate as the stub so a missing API key is only a warning.
        env.insert("QUIZFORGE_VARIANT".to_string(), "stub".to_string());
    }
    let (mut config, report) = load_with_report(&config_path, &env)
        .await
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    quizforge_logging::init_logger(config.logging.dir.as_deref(), &config.logging.level);
    for warning in &report.warnings {
        warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for problem in &report.errors {
        error!(path = %problem.path, message = %problem.message, "Config error");
    }

    // Inspection commands still run on an invalid config.
    let inspecting = matches!(cli.command, Commands::Config | Commands::Status { .. });
    if !inspecting {
        if let Some(first) = report.errors.into_iter().next() {
            bail!(first);
        }
    }

    match cli.command {
        Commands::Serve { port, .. } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Generate { file, mode } => {
            generate_cmd::run(&config, &file, mode).await?;
        }
        Commands::Config => {
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(&redacted_snapshot(&config)?)?);
        }
        Commands::Status { port } => {
            status_cmd::run(port.unwrap_or(config.server.port)).await?;
        }
    }

    Ok(())
}

async fn run_server(config: QuizForgeConfig) -> Result<()> {
    let ip: IpAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind))?;
    let addr = SocketAddr::new(ip, config.server.port);

    info!(
        port = config.server.port,
        bind = %config.server.bind,
        variant = ?config.server.variant,
        upload_dir = %config.uploads.dir.display(),
        "Starting QuizForge"
    );

    let state = app::build_state(&config)?;
    quizforge_gateway::start_server(addr, state).await
}
