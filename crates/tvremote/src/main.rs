//! TV remote controller: command-line entry point.
//!
//! Every subcommand maps onto one function of [`tvremote::api`] and prints
//! the resulting `CommandResult` as JSON on stdout.  Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! tvremote [--config <PATH>] [--state <PATH>] <COMMAND>
//!
//! Commands:
//!   discover      Find televisions on the local network
//!   connect       Pair with a television
//!   status        Show the connection state
//!   key           Send a remote key press
//!   text          Type text into the focused field
//!   launch        Launch an app
//!   smart         "play <something> on <app>"
//!   cast          Open specific content in an app
//!   video-search  Search videos without touching the TV
//!   parse         Show how a smart query would be interpreted
//!   wake          Wake-on-LAN for the saved television
//!   disconnect    Close the channel
//!   keys          List key aliases
//!   config-init   Write the default config file
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable          | Description                                   |
//! |-------------------|-----------------------------------------------|
//! | `TVREMOTE_CONFIG` | Config file path (overrides the platform dir) |
//! | `TVREMOTE_STATE`  | Saved-connection file path                    |
//! | `RUST_LOG`        | Log filter (overrides `[remote] log_level`)   |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tvremote::api::{self, AppState, CommandResult, ConnectArgs};
use tvremote::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, saved_connection_path, AppConfig,
};
use tvremote::infrastructure::storage::SavedConnectionStore;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Host-side controller for a networked television.
#[derive(Debug, Parser)]
#[command(name = "tvremote", version)]
struct Cli {
    /// Config file to read instead of the platform default.
    #[arg(long, global = true, env = "TVREMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Saved-connection file to use instead of the configured one.
    #[arg(long, global = true, env = "TVREMOTE_STATE")]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find televisions on the local network
    Discover {
        /// Search window in seconds [default: from config]
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Pair with a television; approve the prompt on screen the first time
    Connect {
        ip: String,
        #[arg(long)]
        mac: Option<String>,
        #[arg(long)]
        name: Option<String>,
        /// Try only this port instead of the secure-then-plain order
        #[arg(long)]
        port: Option<u16>,
    },

    /// Show the connection state
    Status,

    /// Send a remote key press (alias like `home` or a raw `KEY_*` code)
    Key { key: String },

    /// Type text into the focused field
    Text { text: String },

    /// Launch an app by name or numeric id
    Launch { app: String },

    /// Free-text request such as "play lofi beats on youtube"
    #[command(after_help = "\
Examples:
  tvremote smart 'play lofi beats'
  tvremote smart 'watch stranger things on netflix'")]
    Smart {
        #[arg(num_args = 1.., required = true)]
        query: Vec<String>,
    },

    /// Open a specific content id in an app
    Cast {
        app: String,
        content_id: String,
        #[arg(long)]
        meta_tag: Option<String>,
    },

    /// Search videos without touching the TV
    VideoSearch {
        #[arg(num_args = 1.., required = true)]
        term: Vec<String>,
    },

    /// Show how a smart query would be interpreted
    Parse {
        #[arg(num_args = 1.., required = true)]
        query: Vec<String>,
    },

    /// Wake-on-LAN for the saved television
    Wake,

    /// Close the channel
    Disconnect,

    /// List key aliases and their codes
    Keys,

    /// Write the default config file if none exists
    ConfigInit,
}

impl Command {
    /// Commands that talk over the channel need it open first.
    fn needs_channel(&self) -> bool {
        matches!(
            self,
            Command::Key { .. }
                | Command::Text { .. }
                | Command::Launch { .. }
                | Command::Smart { .. }
                | Command::Cast { .. }
                | Command::Status
        )
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path().context("cannot locate the config directory")?,
    };
    let config = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    // `RUST_LOG` wins over the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.remote.log_level)),
        )
        .init();

    debug!("config loaded from {}", config_path.display());

    if let Command::ConfigInit = cli.command {
        return init_config(&config, &config_path);
    }

    let state_path = match &cli.state {
        Some(path) => path.clone(),
        None => saved_connection_path(&config)
            .context("cannot locate the saved-connection file")?,
    };
    let store = SavedConnectionStore::new(state_path);
    debug!("saved connection file: {}", store.path().display());
    let state = AppState::new(config, store).context("failed to initialise the controller")?;

    if cli.command.needs_channel() && !state.connection.auto_reconnect().await {
        debug!("no saved connection could be restored");
    }

    run(state, cli.command).await
}

fn init_config(config: &AppConfig, path: &std::path::Path) -> anyhow::Result<()> {
    if path.exists() {
        warn!("{} already exists; leaving it untouched", path.display());
        return Ok(());
    }
    save_config_to(config, path)
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}

async fn run(state: Arc<AppState>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Discover { timeout } => {
            print(api::discover(state, timeout.map(Duration::from_secs)).await)
        }
        Command::Connect {
            ip,
            mac,
            name,
            port,
        } => {
            let args = ConnectArgs {
                ip,
                mac,
                friendly_name: name,
                port,
            };
            print(api::connect(state, args).await)
        }
        Command::Status => print(api::status(state).await),
        Command::Key { key } => print(api::key(state, &key).await),
        Command::Text { text } => print(api::text(state, &text).await),
        Command::Launch { app } => print(api::launch(state, &app).await),
        Command::Smart { query } => print(api::smart(state, &query.join(" ")).await),
        Command::Cast {
            app,
            content_id,
            meta_tag,
        } => print(api::cast(state, &app, &content_id, meta_tag.as_deref()).await),
        Command::VideoSearch { term } => print(api::video_search(state, &term.join(" ")).await),
        Command::Parse { query } => print(api::parse_query(&query.join(" "))),
        Command::Wake => print(api::wake(state).await),
        Command::Disconnect => print(api::disconnect(state).await),
        Command::Keys => print(api::list_keys()),
        Command::ConfigInit => Ok(()),
    }
}

/// Writes `result` as pretty JSON; a failed result becomes a non-zero exit.
fn print<T: Serialize>(result: CommandResult<T>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&result).context("failed to encode the response")?;
    println!("{json}");
    match result.error {
        Some(error) if !result.success => Err(anyhow::anyhow!(error)),
        _ => Ok(()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
