//! Storage infrastructure: the TOML config file and the remembered pairing.
//!
//! - `config` reads and writes `config.toml` in the platform config directory,
//!   falling back to defaults on first run.
//! - `saved_connection` keeps the single JSON record (address, MAC, name,
//!   token) that lets the controller reconnect without a new approval prompt.

pub mod config;
pub mod saved_connection;

pub use saved_connection::{SavedConnectionStore, StoreError};
