//! WebSocket transport for the remote-control channel.
//!
//! A [`Dialer`] turns a [`HandshakeRequest`] into a [`PairedChannel`]: the
//! socket is open *and* the device has confirmed it.  Everything the
//! connection manager needs afterwards goes through plain Tokio channels, so
//! the manager never touches a socket directly and tests can substitute a
//! dialer that hands out in-memory channels.
//!
//! # Handshake
//!
//! ```text
//! controller                                  television
//!     │── GET /api/v2/channels/…?name=…&token=… ──▶│
//!     │◀──────────── 101 Switching Protocols ───────│
//!     │                                 (user approves on screen)
//!     │◀── {"event":"ms.channel.connect","data":{"token":"…"}} ──│
//! ```
//!
//! Before confirmation the device may instead send `ms.channel.unauthorized`,
//! close without a status code (1005), or drop the TCP stream (1006).  Those
//! mean the user declined (or ignored) the prompt and map to
//! [`RemoteError::HandshakeRejected`].  A close frame carrying any other code
//! is an ordinary failure ([`RemoteError::ConnectFailed`]).
//!
//! # Pump
//!
//! Once confirmed, the socket is split and driven by one task that
//! `select!`s over three sources: outbound frames, inbound messages and a
//! shutdown signal.  When the task ends for any reason it reports a short
//! reason string on [`PairedChannel::closed`].

use std::net::IpAddr;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::{
    connect_async_tls_with_config,
    tungstenite::{
        error::ProtocolError,
        protocol::{frame::coding::CloseCode, CloseFrame},
        Error as WsError, Message as WsMessage,
    },
    Connector, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, info};
use tvremote_core::{ChannelEvent, ConnectionProfile, RemoteError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the outbound frame queue feeding the pump.
const OUTBOUND_QUEUE: usize = 32;

/// Everything needed to open one channel attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRequest {
    pub ip: IpAddr,
    pub profile: ConnectionProfile,
    pub app_name: String,
    pub token: Option<String>,
}

impl HandshakeRequest {
    pub fn url(&self) -> String {
        self.profile
            .channel_url(self.ip, &self.app_name, self.token.as_deref())
    }
}

/// A text frame queued for the pump, with a slot for the write result.
#[derive(Debug)]
pub struct OutboundFrame {
    pub text: String,
    pub done: oneshot::Sender<Result<(), RemoteError>>,
}

/// A confirmed channel, owned by the connection manager.
#[derive(Debug)]
pub struct PairedChannel {
    /// Token issued in the confirmation event, if the device sent one.
    pub token: Option<String>,
    /// Queue into the pump task.
    pub outbound: mpsc::Sender<OutboundFrame>,
    /// Resolves with a reason once the pump has stopped.
    pub closed: oneshot::Receiver<String>,
    /// Asks the pump to close the socket.  Dropping it has the same effect.
    pub shutdown: oneshot::Sender<()>,
}

/// Opens remote-control channels.
#[async_trait]
pub trait Dialer: Send + Sync {
    /// Opens the socket and waits for the device's confirmation.
    ///
    /// Unbounded in time: the caller applies the handshake timeout.
    async fn open(&self, request: &HandshakeRequest) -> Result<PairedChannel, RemoteError>;
}

/// Production [`Dialer`] backed by `tokio-tungstenite`.
///
/// Secure profiles accept the device's self-signed certificate.
#[derive(Debug, Default, Clone)]
pub struct WebSocketDialer;

#[async_trait]
impl Dialer for WebSocketDialer {
    async fn open(&self, request: &HandshakeRequest) -> Result<PairedChannel, RemoteError> {
        let peer = format!("{}:{}", request.ip, request.profile.port);
        let connector = if request.profile.secure {
            let tls = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| RemoteError::ConnectFailed(format!("TLS setup failed: {e}")))?;
            Some(Connector::NativeTls(tls))
        } else {
            None
        };

        let (mut ws, _response) =
            connect_async_tls_with_config(request.url().as_str(), None, false, connector)
                .await
                .map_err(classify_open_error)?;
        debug!("{peer}: socket open, waiting for confirmation");

        let token = await_confirmation(&mut ws).await?;
        info!(
            "{peer}: channel confirmed{}",
            if token.is_some() { " (token issued)" } else { "" }
        );

        Ok(spawn_pump(ws, peer, token))
    }
}

/// Reads until the device confirms or declines the channel.
async fn await_confirmation(ws: &mut WsStream) -> Result<Option<String>, RemoteError> {
    while let Some(msg) = ws.next().await {
        match msg {
            Ok(WsMessage::Text(text)) => match ChannelEvent::parse(&text) {
                Some(ChannelEvent::Connected { token }) => return Ok(token),
                Some(ChannelEvent::Unauthorized) => return Err(RemoteError::HandshakeRejected),
                Some(ChannelEvent::Other { event }) => {
                    debug!("ignoring event {event:?} before confirmation");
                }
                None => debug!("ignoring non-event message before confirmation"),
            },
            Ok(WsMessage::Close(frame)) => {
                debug!("closed before confirmation ({})", describe_close(frame.as_ref()));
                return Err(classify_close(frame.as_ref()));
            }
            Ok(_) => {}
            Err(e) => return Err(classify_stream_error(e)),
        }
    }
    // Stream ended without a close frame: abnormal closure.
    Err(RemoteError::HandshakeRejected)
}

fn spawn_pump(ws: WsStream, peer: String, token: Option<String>) -> PairedChannel {
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<OutboundFrame>(OUTBOUND_QUEUE);
    let (closed_tx, closed_rx) = oneshot::channel();
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let (mut sink, mut stream) = ws.split();

    tokio::spawn(async move {
        let reason = loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    let _ = sink.close().await;
                    break "closed locally".to_string();
                }
                outbound = outbound_rx.recv() => match outbound {
                    Some(frame) => {
                        let result = sink
                            .send(WsMessage::Text(frame.text))
                            .await
                            .map_err(|e| RemoteError::Network(e.to_string()));
                        let failed = result.is_err();
                        let _ = frame.done.send(result);
                        if failed {
                            break "write failed".to_string();
                        }
                    }
                    None => {
                        let _ = sink.close().await;
                        break "owner dropped".to_string();
                    }
                },
                inbound = stream.next() => match inbound {
                    Some(Ok(WsMessage::Text(text))) => debug!("{peer}: inbound {text}"),
                    Some(Ok(WsMessage::Close(frame))) => {
                        break format!("closed by device ({})", describe_close(frame.as_ref()));
                    }
                    Some(Ok(_)) => {}
                    Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                        break "connection reset".to_string();
                    }
                    Some(Err(e)) => break format!("read error: {e}"),
                    None => break "stream ended".to_string(),
                },
            }
        };
        debug!("{peer}: pump stopped: {reason}");
        let _ = closed_tx.send(reason);
    });

    PairedChannel {
        token,
        outbound: outbound_tx,
        closed: closed_rx,
        shutdown: shutdown_tx,
    }
}

/// `true` for stream errors that mean the device dropped the connection.
fn is_abnormal_closure(e: &WsError) -> bool {
    matches!(
        e,
        WsError::ConnectionClosed | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake)
    ) || matches!(e, WsError::Io(io) if io.kind() == std::io::ErrorKind::ConnectionReset)
}

fn classify_stream_error(e: WsError) -> RemoteError {
    if is_abnormal_closure(&e) {
        RemoteError::HandshakeRejected
    } else {
        RemoteError::ConnectFailed(e.to_string())
    }
}

fn classify_open_error(e: WsError) -> RemoteError {
    match &e {
        WsError::Http(response) if matches!(response.status().as_u16(), 401 | 403) => {
            RemoteError::HandshakeRejected
        }
        _ => classify_stream_error(e),
    }
}

/// Only the no-status and abnormal close codes signal a declined pairing.
fn classify_close(frame: Option<&CloseFrame<'_>>) -> RemoteError {
    match frame.map(|f| f.code) {
        None | Some(CloseCode::Status) | Some(CloseCode::Abnormal) => {
            RemoteError::HandshakeRejected
        }
        Some(_) => RemoteError::ConnectFailed(format!(
            "closed before confirmation ({})",
            describe_close(frame)
        )),
    }
}

/// Close codes 1005 (no status) and 1006 (abnormal) are never sent on the
/// wire; a frame without a payload is reported as 1005.
fn describe_close(frame: Option<&CloseFrame<'_>>) -> String {
    match frame {
        Some(f) => format!("code {}", u16::from(f.code)),
        None => format!("code {}", u16::from(CloseCode::Status)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_request_url_uses_profile_scheme() {
        let req = HandshakeRequest {
            ip: "192.168.1.50".parse().unwrap(),
            profile: ConnectionProfile::SECURE,
            app_name: "TV Remote".to_string(),
            token: Some("999".to_string()),
        };
        let url = req.url();
        assert!(url.starts_with("wss://192.168.1.50:8002/"), "got {url}");
        assert!(url.ends_with("&token=999"), "got {url}");
    }

    #[test]
    fn test_reset_without_closing_handshake_is_rejection() {
        let err = WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake);
        assert_eq!(classify_stream_error(err), RemoteError::HandshakeRejected);
    }

    #[test]
    fn test_connection_closed_is_rejection() {
        assert_eq!(
            classify_stream_error(WsError::ConnectionClosed),
            RemoteError::HandshakeRejected
        );
    }

    #[test]
    fn test_connection_reset_io_error_is_rejection() {
        let io = std::io::Error::from(std::io::ErrorKind::ConnectionReset);
        assert_eq!(
            classify_stream_error(WsError::Io(io)),
            RemoteError::HandshakeRejected
        );
    }

    #[test]
    fn test_refused_connection_is_connect_failure() {
        let io = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert!(matches!(
            classify_open_error(WsError::Io(io)),
            RemoteError::ConnectFailed(_)
        ));
    }

    #[test]
    fn test_describe_close_without_payload_reports_no_status() {
        assert_eq!(describe_close(None), "code 1005");
    }

    #[test]
    fn test_close_without_status_is_rejection() {
        assert_eq!(classify_close(None), RemoteError::HandshakeRejected);
        let abnormal = CloseFrame {
            code: CloseCode::Abnormal,
            reason: "".into(),
        };
        assert_eq!(classify_close(Some(&abnormal)), RemoteError::HandshakeRejected);
    }

    #[test]
    fn test_close_with_server_error_is_connect_failure() {
        // Arrange
        let frame = CloseFrame {
            code: CloseCode::Error,
            reason: "internal".into(),
        };

        // Act
        let error = classify_close(Some(&frame));

        // Assert
        assert_eq!(
            error,
            RemoteError::ConnectFailed("closed before confirmation (code 1011)".into())
        );
    }

    #[test]
    fn test_describe_close_with_payload_reports_code() {
        let frame = CloseFrame {
            code: CloseCode::Policy,
            reason: "unauthorized".into(),
        };
        assert_eq!(describe_close(Some(&frame)), "code 1008");
    }
}
