//! # tvremote-core
//!
//! Shared library for the TV remote controller containing the device model,
//! the error taxonomy, the remote-control wire protocol, and the lookup tables
//! (symbolic keys, application ids) used to translate user intent into device
//! commands.
//!
//! It has zero dependencies on sockets, HTTP clients, file systems or async
//! runtimes, so everything here is unit-testable without a television.
//!
//! # Architecture overview
//!
//! The controller talks to a single television over two paths:
//!
//! - A persistent WebSocket **channel** opened with a pairing handshake.  Key
//!   presses, text input and deep links are sent as small JSON frames.
//! - A plain **REST** endpoint on the device used for launching applications
//!   (and as a fallback path for deep links).
//!
//! This crate defines:
//!
//! - **`domain`** – `Device`, `SavedConnection` and `ConnectionStatus`.
//! - **`error`** – `RemoteError`, the taxonomy every core operation reports.
//! - **`protocol`** – Outbound command frames, inbound channel events, and the
//!   connection profiles (port + transport security) used by the handshake.
//! - **`keymap`** – The symbolic key table (`"home"` → `KEY_HOME`).
//! - **`apps`** – The application name → id table.
//! - **`query`** – The pure smart-query parser that turns free text into an
//!   `(app, search term)` pair.

pub mod apps;
pub mod domain;
pub mod error;
pub mod keymap;
pub mod protocol;
pub mod query;

// Re-export the most-used types at the crate root so callers can write
// `tvremote_core::Device` instead of `tvremote_core::domain::device::Device`.
pub use apps::{resolve_app_id, resolve_launch_id, AppEntry, KNOWN_APPS};
pub use domain::{ConnectionStatus, Device, SavedConnection, VideoResult};
pub use error::RemoteError;
pub use keymap::{resolve_key, KeyEntry, KEY_TABLE};
pub use protocol::messages::{ChannelEvent, RemoteCommand};
pub use protocol::profile::ConnectionProfile;
pub use query::{parse_smart_query, SmartQuery};
