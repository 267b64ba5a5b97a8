//! Domain entities for the TV remote controller.
//!
//! This module contains plain data types with no infrastructure dependencies.
//! They are the "nouns" every other layer talks about:
//!
//! - [`Device`] – a television found on the network (or remembered from disk).
//! - [`SavedConnection`] – the single persisted pairing record.
//! - [`ConnectionStatus`] – what the request layer reports for `status`.
//! - [`VideoResult`] – one video search hit.
//!
//! The first three serialize with camelCase field names because they cross the
//! request-layer boundary as JSON (`friendlyName`, not `friendly_name`).

pub mod device;
pub mod video;

pub use device::{ConnectionStatus, Device, SavedConnection};
pub use video::VideoResult;
