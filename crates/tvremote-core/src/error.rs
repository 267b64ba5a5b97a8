//! Error taxonomy shared by every core operation.
//!
//! The request layer is the only place these become user-visible strings, so
//! the `Display` text of each variant is written to be shown as-is.

use thiserror::Error;

/// Errors reported by the connection manager, command channel and wake signal.
///
/// Discovery and video search never produce these: they degrade to empty
/// results instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The operation needs a live channel (or an associated device) and there is none.
    #[error("not connected to a TV")]
    NotConnected,

    /// The application name is not in the known table (and is not a usable raw id).
    #[error("unknown app: {0}")]
    UnknownApp(String),

    /// The device never confirmed the channel within the handshake timeout.
    #[error("timed out waiting for the TV to accept the connection")]
    HandshakeTimeout,

    /// The device refused pairing; the user must approve it on screen.
    #[error("connection rejected - approve the connection on the TV and try again")]
    HandshakeRejected,

    /// The live channel closed underneath a send.
    #[error("connection to the TV was closed")]
    TransportClosed,

    /// The channel transport could not be opened at all (refused, DNS, TLS).
    #[error("failed to open connection to the TV: {0}")]
    ConnectFailed(String),

    /// A REST call (or wake broadcast) failed.
    #[error("network error: {0}")]
    Network(String),

    /// A required persisted record does not exist.
    #[error("{0} not found")]
    NotFound(String),
}

impl RemoteError {
    /// Short machine-readable code for the request layer's JSON responses.
    pub fn code(&self) -> &'static str {
        match self {
            RemoteError::NotConnected => "NotConnected",
            RemoteError::UnknownApp(_) => "UnknownApp",
            RemoteError::HandshakeTimeout => "HandshakeTimeout",
            RemoteError::HandshakeRejected => "HandshakeRejected",
            RemoteError::TransportClosed => "TransportClosed",
            RemoteError::ConnectFailed(_) => "ConnectFailed",
            RemoteError::Network(_) => "NetworkError",
            RemoteError::NotFound(_) => "NotFound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_tells_user_to_approve_on_tv() {
        let msg = RemoteError::HandshakeRejected.to_string();
        assert!(msg.contains("approve the connection on the TV"), "got: {msg}");
    }

    #[test]
    fn test_unknown_app_message_includes_name() {
        assert_eq!(
            RemoteError::UnknownApp("Crunchyroll".into()).to_string(),
            "unknown app: Crunchyroll"
        );
    }

    #[test]
    fn test_codes_match_request_layer_names() {
        assert_eq!(RemoteError::NotConnected.code(), "NotConnected");
        assert_eq!(RemoteError::Network("x".into()).code(), "NetworkError");
        assert_eq!(RemoteError::NotFound("saved TV".into()).code(), "NotFound");
    }
}
