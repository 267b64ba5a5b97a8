//! Network infrastructure.
//!
//! # Sub-modules
//!
//! - **`transport`** – Opens the WebSocket remote-control channel, waits for
//!   the device's confirmation, and runs the per-channel pump task.
//!
//! - **`connection_manager`** – Owns the one live channel: profile fallback,
//!   token reuse, persistence of the pairing, and closure bookkeeping.
//!
//! - **`rest`** – The device's HTTP endpoints for app launch and the
//!   deep-link fallback.
//!
//! - **`discovery`** – Finds televisions on the LAN (SSDP, then a /24 probe).
//!
//! - **`wake`** – Wake-on-LAN magic packets for the saved device.

pub mod connection_manager;
pub mod discovery;
pub mod rest;
pub mod transport;
pub mod wake;

pub use connection_manager::{ConnectRequest, ConnectionManager, ConnectionSettings};
pub use discovery::DiscoveryService;
pub use rest::HttpDeviceRest;
pub use transport::{Dialer, WebSocketDialer};
