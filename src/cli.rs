//! CLI definitions for uihealth.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default configuration file, relative to the working directory.
pub(crate) const DEFAULT_CONFIG: &str = "uihealth.toml";

/// uihealth CLI.
#[derive(Parser)]
#[command(name = "uihealth")]
#[command(about = "Health verification for web dashboards")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: uihealth.toml, built-in defaults if absent)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory; relative config and artifact paths resolve against it
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Base URL of the application under test
    #[arg(long, env = "DASH_BASE", global = true)]
    pub base: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Structural health check of every registry page (default)
    Check,

    /// Usability evaluation of every registry page through the MCP agent
    Agent,

    /// Full-page screenshot of a single URL
    Snap {
        /// Page to capture
        #[arg(long)]
        url: String,

        /// Output file
        #[arg(long, default_value = "artifacts/ui_health/snap.png")]
        out: PathBuf,
    },

    /// Load and validate the configuration
    Validate,
}
