//! ChatPilot - web chat UI automation.
//!
//! Main entry point for the ChatPilot CLI.

use std::path::PathBuf;

use clap::Parser;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod cmd_queue;
mod cmd_run;
mod executor;
mod wiring;

use cli::{Cli, Commands};

/// Get the .chatpilot directory path.
fn chatpilot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".chatpilot"))
        .unwrap_or_else(|| PathBuf::from(".chatpilot"))
}

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.chatpilot/debug/ with daily rotation.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = chatpilot_dir().join("debug");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("chatpilot")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Keep the appender's worker alive for the program duration.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(_guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        // Console layer (human-readable text format with colors)
        .with(fmt::layer().with_target(true).with_ansi(true))
        // File layer (text format without colors)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing()?;

    let cli = Cli::parse();

    let mut settings = chatpilot_config::ConfigLoader::load_or_default(&cli.config)?;
    if let Some(endpoint) = cli.endpoint {
        settings.browser.endpoint = endpoint;
    }

    match cli.command {
        Commands::Run { job } => cmd_run::run(settings, job).await,
        Commands::Enqueue { job } => cmd_queue::enqueue(settings, job).await,
        Commands::Worker => cmd_queue::worker(settings).await,
        Commands::Status { job_id } => cmd_queue::status(settings, job_id).await,
        Commands::Providers => cmd_run::providers(settings),
        Commands::Cleanup { retain_days } => cmd_queue::cleanup(settings, retain_days).await,
    }
}
