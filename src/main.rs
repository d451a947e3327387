use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli_exec;

#[derive(Parser)]
#[command(name = "default-dashboard")]
#[command(
    about = "Keep a Home Assistant default dashboard in sync with its helpers",
    long_about = None
)]
pub(crate) struct Cli {
    /// Profile directory holding config.json and state.json
    #[arg(long, env = "DEFAULT_DASHBOARD_DIR", default_value = default_dashboard::store::STORE_DIR)]
    pub(crate) state_dir: PathBuf,

    /// Home Assistant base url (overrides config.json)
    #[arg(long, env = "HASS_URL")]
    pub(crate) url: Option<String>,

    /// Long-lived access token (overrides config.json)
    #[arg(long, env = "HASS_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// Act as this user name instead of the token's user
    #[arg(long)]
    pub(crate) user_name: Option<String>,

    /// Act as this user id instead of the token's user
    #[arg(long)]
    pub(crate) user_id: Option<String>,

    /// Debug logging
    #[arg(short, long)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Write config.json into the profile directory
    Init {
        #[arg(long)]
        url: String,
        /// Store the token in config.json (prefer HASS_TOKEN)
        #[arg(long)]
        token: Option<String>,
        /// Helper object id
        #[arg(long, default_value = "default_dashboard")]
        helper_name: String,
        /// Create the user's helpers when none resolve
        #[arg(long)]
        create_missing_helpers: bool,
        /// Overwrite an existing config.json
        #[arg(long)]
        force: bool,
    },

    /// Resolve and apply the default dashboard (or run a pending refresh)
    Run {
        /// Skip the readiness wait
        #[arg(long)]
        no_wait: bool,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Show helper ids, resolution and stored settings without writing
    Status {
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the helper entities
    Helpers {
        #[command(subcommand)]
        command: HelperCommands,
    },

    /// Set the default dashboard directly or from a JSON document
    Pin {
        /// Dashboard url path
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        dashboard: Option<String>,
        /// JSON document with "default" and per-user "users" entries
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub(crate) enum HelperCommands {
    /// Create the current user's selector and toggle helpers if missing
    Create,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(cli_exec::handle_command(cli))
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("default_dashboard={}", level)))
        .context("parse log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
