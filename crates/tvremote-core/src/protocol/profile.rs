//! Connection profiles and device URLs.
//!
//! Two transport variants of the remote-control channel coexist across
//! firmware generations:
//!
//! | Port | Scheme | Notes                                           |
//! |------|--------|-------------------------------------------------|
//! | 8002 | `wss`  | Current firmware; self-signed certificate.      |
//! | 8001 | `ws`   | Older firmware; unencrypted.                    |
//!
//! The handshake tries [`ConnectionProfile::DEFAULT_ORDER`] in sequence and
//! stops at the first profile that yields a confirmed channel.  The REST
//! endpoints always live on the plain port.

use std::net::{IpAddr, SocketAddr};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Port of the unencrypted channel and of the REST API.
pub const PLAIN_PORT: u16 = 8001;

/// Port of the TLS channel.
pub const SECURE_PORT: u16 = 8002;

const CHANNEL_PATH: &str = "/api/v2/channels/samsung.remote.control";

/// One way of reaching the remote-control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionProfile {
    pub port: u16,
    /// `true` → `wss://` with certificate verification disabled.
    pub secure: bool,
}

impl ConnectionProfile {
    pub const SECURE: Self = Self {
        port: SECURE_PORT,
        secure: true,
    };

    pub const PLAIN: Self = Self {
        port: PLAIN_PORT,
        secure: false,
    };

    /// Profiles tried, in order, when the caller does not pin a port.
    pub const DEFAULT_ORDER: [Self; 2] = [Self::SECURE, Self::PLAIN];

    /// Profile for an explicitly requested port.  Only 8002 speaks TLS.
    pub fn for_port(port: u16) -> Self {
        Self {
            port,
            secure: port == SECURE_PORT,
        }
    }

    fn scheme(&self) -> &'static str {
        if self.secure {
            "wss"
        } else {
            "ws"
        }
    }

    /// Builds the channel URL presenting `app_name` (base64) and an optional token.
    pub fn channel_url(&self, ip: IpAddr, app_name: &str, token: Option<&str>) -> String {
        let host = SocketAddr::new(ip, self.port);
        let name = BASE64.encode(app_name.as_bytes());
        match token {
            Some(token) => format!(
                "{}://{host}{CHANNEL_PATH}?name={name}&token={token}",
                self.scheme()
            ),
            None => format!("{}://{host}{CHANNEL_PATH}?name={name}", self.scheme()),
        }
    }

    /// Device information document served on this profile's port.
    pub fn device_info_url(&self, ip: IpAddr) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{}/api/v2/", SocketAddr::new(ip, self.port))
    }
}

/// REST endpoint that launches (or deep-links into) an application.
pub fn app_launch_url(ip: IpAddr, app_id: &str) -> String {
    format!(
        "http://{}/api/v2/applications/{app_id}",
        SocketAddr::new(ip, PLAIN_PORT)
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
