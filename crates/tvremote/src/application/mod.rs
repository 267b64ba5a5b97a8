//! Application layer use cases.
//!
//! Use cases here orchestrate core types to fulfil a user goal and depend on
//! traits, never on sockets or files.  `infrastructure` provides the
//! implementations:
//!
//! | Trait           | Implemented by                                  |
//! |-----------------|-------------------------------------------------|
//! | `RemoteChannel` | `infrastructure::network::ConnectionManager`    |
//! | `DeviceRest`    | `infrastructure::network::HttpDeviceRest`       |
//! | `VideoSearch`   | `infrastructure::search::VideoSearchClient`     |
//!
//! # Sub-modules
//!
//! - **`commands`** – Key presses, text input, app launch and deep-link
//!   casting, with the channel-then-REST fallback for casts.
//!
//! - **`smart_search`** – Turns a free-text request into a cast, and falls
//!   back to scripting the TV's own search screen when that fails.

pub mod commands;
pub mod smart_search;

pub use commands::{CommandChannel, DeviceRest, RemoteChannel, RemoteControl};
pub use smart_search::{SmartSearchEngine, SmartSearchOutcome, VideoSearch};
