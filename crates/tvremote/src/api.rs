//! Request layer: every user-facing action as one async function.
//!
//! Each function takes the shared [`AppState`] and returns a
//! [`CommandResult<T>`], so every response has the same JSON shape:
//!
//! ```json
//! { "success": false, "data": null, "error": "not connected to a TV", "code": "NotConnected" }
//! ```
//!
//! This is the only place where [`RemoteError`] becomes a user-visible
//! string.  `code` carries [`RemoteError::code`] so callers can branch on
//! the failure kind without matching prose.
//!
//! The CLI in `main.rs` is one consumer; anything that can hold an
//! `Arc<AppState>` (an HTTP shim, a desktop shell) can be another.
//!
//! # Data Transfer Objects
//!
//! Request arguments that arrive as loose strings (`ConnectArgs`) and table
//! rows that need a stable JSON shape (`KeyDto`) are plain serde structs
//! defined here.  Core types that already serialize (`Device`,
//! `ConnectionStatus`, `VideoResult`, `SmartQuery`) are returned as-is.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tvremote_core::{
    parse_smart_query, ConnectionStatus, Device, RemoteError, SmartQuery, VideoResult,
};

use crate::application::{
    CommandChannel, DeviceRest, SmartSearchEngine, SmartSearchOutcome, VideoSearch,
};
use crate::infrastructure::network::discovery::DiscoveryError;
use crate::infrastructure::network::{
    wake, ConnectRequest, ConnectionManager, ConnectionSettings, DiscoveryService, HttpDeviceRest,
    WebSocketDialer,
};
use crate::infrastructure::search::VideoSearchClient;
use crate::infrastructure::storage::config::AppConfig;
use crate::infrastructure::storage::SavedConnectionStore;

// ── Shared application state ──────────────────────────────────────────────────

/// Failure to assemble the production [`AppState`].
#[derive(Debug, Error)]
pub enum InitError {
    #[error("discovery setup failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("device REST setup failed: {0}")]
    Rest(#[source] RemoteError),
}

/// Everything the request functions share.  Built once per process and
/// passed around as `Arc<AppState>`.
pub struct AppState {
    pub connection: Arc<ConnectionManager>,
    pub commands: Arc<CommandChannel>,
    pub smart: SmartSearchEngine,
    pub videos: Arc<dyn VideoSearch>,
    pub discovery: DiscoveryService,
    pub config: AppConfig,
}

impl AppState {
    /// Wires the production implementations from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if one of the HTTP clients cannot be built.
    pub fn new(config: AppConfig, store: SavedConnectionStore) -> Result<Arc<Self>, InitError> {
        let settings = ConnectionSettings {
            app_name: config.remote.app_name.clone(),
            handshake_timeout: config.network.handshake_timeout(),
        };
        let connection = Arc::new(ConnectionManager::new(
            Arc::new(WebSocketDialer),
            store,
            settings,
        ));
        let rest =
            Arc::new(HttpDeviceRest::new(config.network.rest_timeout()).map_err(InitError::Rest)?);
        let videos = Arc::new(VideoSearchClient::new(
            config.search.user_agent.clone(),
            config.search.result_limit,
            config.network.rest_timeout() * 2,
        )?);
        let discovery = DiscoveryService::with_default_chain(config.network.probe_timeout())?;

        Ok(Self::from_parts(config, connection, rest, videos, discovery))
    }

    /// Assembles a state from explicit parts.
    pub fn from_parts(
        config: AppConfig,
        connection: Arc<ConnectionManager>,
        rest: Arc<dyn DeviceRest>,
        videos: Arc<dyn VideoSearch>,
        discovery: DiscoveryService,
    ) -> Arc<Self> {
        let commands = Arc::new(CommandChannel::new(connection.clone(), rest));
        let smart = SmartSearchEngine::new(commands.clone(), videos.clone());
        Arc::new(Self {
            connection,
            commands,
            smart,
            videos,
            discovery,
            config,
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// Arguments of [`connect`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectArgs {
    pub ip: String,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// One row of the key table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDto {
    pub alias: String,
    pub code: String,
}

/// Unified response wrapper used by every request function.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    /// Taxonomy code of the failure, when it came from a [`RemoteError`].
    #[serde(default)]
    pub code: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
            code: None,
        }
    }

    pub fn failed(error: &RemoteError) -> Self {
        Self {
            code: Some(error.code().to_string()),
            ..Self::err(error.to_string())
        }
    }
}

impl<T: Serialize> From<Result<T, RemoteError>> for CommandResult<T> {
    fn from(result: Result<T, RemoteError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(&e),
        }
    }
}

// ── Request functions ─────────────────────────────────────────────────────────

/// Finds televisions on the LAN.  `window` defaults to the configured
/// discovery timeout.
pub async fn discover(
    state: Arc<AppState>,
    window: Option<Duration>,
) -> CommandResult<Vec<Device>> {
    let window = window.unwrap_or_else(|| state.config.network.discovery_timeout());
    CommandResult::ok(state.discovery.discover(window).await)
}

/// Pairs with (or reconnects to) the television at `args.ip`.
pub async fn connect(state: Arc<AppState>, args: ConnectArgs) -> CommandResult<Device> {
    let ip: IpAddr = match args.ip.trim().parse() {
        Ok(ip) => ip,
        Err(_) => return CommandResult::err(format!("invalid IP address {:?}", args.ip)),
    };
    let request = ConnectRequest {
        ip,
        mac: args.mac.unwrap_or_default(),
        friendly_name: args.friendly_name,
        port: args.port,
    };
    state.connection.connect(request).await.into()
}

pub async fn status(state: Arc<AppState>) -> CommandResult<ConnectionStatus> {
    CommandResult::ok(state.connection.status().await)
}

/// Sends one key press.  Returns the code sent.
pub async fn key(state: Arc<AppState>, key: &str) -> CommandResult<String> {
    state.commands.send_key(key).await.into()
}

pub async fn text(state: Arc<AppState>, text: &str) -> CommandResult<()> {
    state.commands.send_text(text).await.into()
}

/// Launches an app.  Returns the app id launched.
pub async fn launch(state: Arc<AppState>, app: &str) -> CommandResult<String> {
    state.commands.launch_app(app).await.into()
}

/// Free-text "play X on Y".  `success` mirrors the outcome.
pub async fn smart(state: Arc<AppState>, query: &str) -> CommandResult<SmartSearchOutcome> {
    let outcome = state.smart.smart_search(query).await;
    CommandResult {
        success: outcome.success,
        error: outcome.message.clone(),
        code: outcome.error.clone(),
        data: Some(outcome),
    }
}

pub async fn cast(
    state: Arc<AppState>,
    app: &str,
    content_id: &str,
    meta_tag: Option<&str>,
) -> CommandResult<()> {
    state
        .commands
        .cast_to_tv(app, content_id, meta_tag)
        .await
        .into()
}

pub async fn video_search(state: Arc<AppState>, term: &str) -> CommandResult<Vec<VideoResult>> {
    CommandResult::ok(state.videos.search(term).await)
}

/// Pure: shows how a smart query would be interpreted.
pub fn parse_query(query: &str) -> CommandResult<SmartQuery> {
    CommandResult::ok(parse_smart_query(query))
}

/// Wake-on-LAN for the saved television.
pub async fn wake(state: Arc<AppState>) -> CommandResult<()> {
    wake::wake_saved(state.connection.store()).await.into()
}

pub async fn disconnect(state: Arc<AppState>) -> CommandResult<()> {
    state.connection.disconnect().await;
    CommandResult::ok(())
}

pub fn list_keys() -> CommandResult<Vec<KeyDto>> {
    CommandResult::ok(
        CommandChannel::list_keys()
            .iter()
            .map(|k| KeyDto {
                alias: k.alias.to_string(),
                code: k.code.to_string(),
            })
            .collect(),
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
