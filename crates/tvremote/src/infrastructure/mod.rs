//! Infrastructure layer for the host controller.
//!
//! Contains OS-facing adapters: the WebSocket channel and device REST
//! clients, LAN discovery and Wake-on-LAN, the video search scraper, and
//! file-system storage for configuration and the saved connection.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `tvremote_core`, but MUST NOT be imported by the `application` or domain
//! layers.

pub mod network;
pub mod search;
pub mod storage;
