//! Remote-control wire protocol: JSON command frames, inbound channel events,
//! and the connection profiles / URLs the device exposes.
//!
//! # Protocol at a glance
//!
//! ```text
//! Host                                          Television
//! ────                                          ──────────
//! WebSocket open  /api/v2/channels/samsung.remote.control?name=<b64>&token=<t>
//!                                  ◄──────────  {"event":"ms.channel.connect","data":{"token":"…"}}
//! {"method":"ms.remote.control",…} ──────────►  (key press / text input, no reply)
//! {"method":"ms.channel.emit",…}   ──────────►  (deep link, no reply)
//!
//! POST http://<ip>:8001/api/v2/applications/<appId>    (REST launch / deep-link fallback)
//! ```
//!
//! The only awaited response in the whole protocol is the `ms.channel.connect`
//! confirmation; every command afterwards is fire-and-forget.

pub mod messages;
pub mod profile;

pub use messages::{ChannelEvent, RemoteCommand};
pub use profile::ConnectionProfile;
