//! uihealth - health verification for web dashboards
//!
//! Main entry point. Machine-readable results go to stdout, logs and fatal
//! errors to stderr.

mod cli;
mod cmd_agent;
mod cmd_check;
mod cmd_validate;
mod fatal;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use uihealth_config::{Config, ConfigLoader, ConfigValidator};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG};
use crate::fatal::Fatal;

/// Get the ~/.uihealth directory path.
fn uihealth_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".uihealth"))
        .unwrap_or_else(|| PathBuf::from(".uihealth"))
}

/// Daily-rotated log file under ~/.uihealth/logs, if the directory is usable.
fn file_writer() -> Option<NonBlocking> {
    let log_dir = uihealth_dir().join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("uihealth")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)
        .ok()?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Flushes pending lines when the process exits.
    static GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    Some(non_blocking)
}

/// Initialize tracing: stderr always, plus a log file when possible.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_writer().map(|writer| fmt::layer().with_writer(writer).with_ansi(false)))
        .init();
}

/// Print a JSON document on stdout.
pub(crate) fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("Failed to serialize output: {}", e),
    }
}

fn load_config(path: Option<&Path>, base: Option<&str>) -> Result<Config, Fatal> {
    let mut config = match path {
        Some(path) => ConfigLoader::load(path),
        None => ConfigLoader::load_or_default(Path::new(DEFAULT_CONFIG)),
    }
    .map_err(Fatal::config)?;

    if let Some(base) = base {
        config.target.base_url = base.to_string();
    }
    config.target.base_url = config.target.base_url.trim_end_matches('/').to_string();
    Ok(config)
}

/// Blocking validation errors abort; warnings are logged.
fn ensure_valid(config: &Config) -> Result<(), Fatal> {
    let result = ConfigValidator::validate(config);
    for warning in &result.warnings {
        warn!("Config: {}", warning);
    }
    if result.is_valid() {
        Ok(())
    } else {
        Err(Fatal::invalid(&result))
    }
}

async fn dispatch(cli: Cli) -> Result<ExitCode, Fatal> {
    if let Some(dir) = &cli.work_dir {
        std::env::set_current_dir(dir).map_err(|e| Fatal::config(e.into()))?;
        debug!("Working directory: {}", dir.display());
    }

    let config = load_config(cli.config.as_deref(), cli.base.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Check);

    if let Commands::Validate = command {
        return Ok(cmd_validate::run_validate(&config));
    }
    ensure_valid(&config)?;

    match command {
        Commands::Check => cmd_check::run_check(&config).await,
        Commands::Agent => cmd_agent::run_agent(&config).await,
        Commands::Snap { url, out } => cmd_check::run_snap(&config, &url, &out).await,
        Commands::Validate => Ok(cmd_validate::run_validate(&config)),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match dispatch(cli).await {
        Ok(code) => code,
        Err(fatal) => {
            tracing::error!("Fatal: {}", fatal.kind());
            fatal.emit();
            ExitCode::FAILURE
        }
    }
}
