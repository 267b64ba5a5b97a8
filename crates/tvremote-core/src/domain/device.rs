//! Device identity and the persisted pairing record.
//!
//! # Identity
//!
//! A television is addressed by its IPv4 address.  The MAC address is kept
//! alongside it for the Wake-on-LAN signal, and the friendly name is purely
//! cosmetic.  Discovery deduplicates by `ip`, and the connection manager only
//! recovers a saved token when the requested `ip` matches the saved one.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// A television discovered on (or remembered from) the local network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Addressable key of the device.
    pub ip: IpAddr,
    /// Hardware address, e.g. `"a0:b1:c2:d3:e4:f5"`.  Empty when unknown.
    #[serde(default)]
    pub mac: String,
    /// Display name reported by the device (or chosen by the user).
    #[serde(default)]
    pub friendly_name: String,
}

impl Device {
    /// Creates a device record.
    pub fn new(ip: IpAddr, mac: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        Self {
            ip,
            mac: mac.into(),
            friendly_name: friendly_name.into(),
        }
    }
}

/// The one remembered pairing, persisted as a single JSON record.
///
/// Overwritten wholesale on every successful connect.  Optional fields are
/// omitted from the JSON when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedConnection {
    pub ip: IpAddr,
    #[serde(default)]
    pub mac: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Device-issued credential permitting reconnection without re-approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SavedConnection {
    /// Returns the saved token only when it belongs to `ip`.
    pub fn token_for(&self, ip: IpAddr) -> Option<&str> {
        if self.ip == ip {
            self.token.as_deref()
        } else {
            None
        }
    }

    /// The device this record describes.
    pub fn device(&self) -> Device {
        Device {
            ip: self.ip,
            mac: self.mac.clone(),
            friendly_name: self.friendly_name.clone().unwrap_or_default(),
        }
    }
}

/// Snapshot returned by the `status` action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
}

impl ConnectionStatus {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            device: None,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
