//! Command frames sent to the television and events received from it.
//!
//! Every frame is a JSON object.  Outbound frames carry a `method` and a
//! `params` object; inbound frames carry an `event` name and an optional
//! `data` object.  Unknown inbound events are kept as [`ChannelEvent::Other`]
//! so the connection pump can log them for diagnostics.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name the device sends once the channel is authorized.
pub const CHANNEL_CONNECT_EVENT: &str = "ms.channel.connect";

/// Event name the device sends when the user denies (or ignores) pairing.
pub const CHANNEL_UNAUTHORIZED_EVENT: &str = "ms.channel.unauthorized";

const REMOTE_CONTROL_METHOD: &str = "ms.remote.control";
const CHANNEL_EMIT_METHOD: &str = "ms.channel.emit";
const APP_LAUNCH_EVENT: &str = "ed.apps.launch";
const DEEP_LINK_ACTION: &str = "DEEP_LINK";

// ── Outbound ──────────────────────────────────────────────────────────────────

/// A command to dispatch over the live channel.
///
/// Commands are ephemeral: they are built, encoded with [`RemoteCommand::to_frame`],
/// queued on the channel, and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// A single remote-control key click (`KEY_HOME`, `KEY_VOLUP`, …).
    Key { code: String },
    /// A string typed into the focused on-screen keyboard.
    Text { text: String },
    /// Launch an application straight into a piece of content.
    DeepLink { app_id: String, meta_tag: String },
}

#[derive(Serialize)]
struct Frame<'a, P: Serialize> {
    method: &'a str,
    params: P,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct RemoteControlParams<'a> {
    cmd: &'a str,
    data_of_cmd: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    option: Option<&'a str>,
    type_of_remote: &'a str,
}

#[derive(Serialize)]
struct EmitParams<'a> {
    event: &'a str,
    to: &'a str,
    data: DeepLinkData<'a>,
}

#[derive(Serialize)]
struct DeepLinkData<'a> {
    #[serde(rename = "appId")]
    app_id: &'a str,
    action_type: &'a str,
    #[serde(rename = "metaTag")]
    meta_tag: &'a str,
}

impl RemoteCommand {
    /// Encodes the command as the JSON text frame the device expects.
    pub fn to_frame(&self) -> String {
        let encoded = match self {
            RemoteCommand::Key { code } => serde_json::to_string(&Frame {
                method: REMOTE_CONTROL_METHOD,
                params: RemoteControlParams {
                    cmd: "Click",
                    data_of_cmd: code,
                    option: Some("false"),
                    type_of_remote: "SendRemoteKey",
                },
            }),
            RemoteCommand::Text { text } => {
                let payload = BASE64.encode(text.as_bytes());
                serde_json::to_string(&Frame {
                    method: REMOTE_CONTROL_METHOD,
                    params: RemoteControlParams {
                        cmd: &payload,
                        data_of_cmd: "base64",
                        option: None,
                        type_of_remote: "SendInputString",
                    },
                })
            }
            RemoteCommand::DeepLink { app_id, meta_tag } => serde_json::to_string(&Frame {
                method: CHANNEL_EMIT_METHOD,
                params: EmitParams {
                    event: APP_LAUNCH_EVENT,
                    to: "host",
                    data: DeepLinkData {
                        app_id,
                        action_type: DEEP_LINK_ACTION,
                        meta_tag,
                    },
                },
            }),
        };
        // Serializing plain string-only structs cannot fail.
        encoded.unwrap_or_default()
    }
}

/// JSON body for the REST deep-link fallback (`POST /api/v2/applications/<id>`).
pub fn deep_link_rest_body(meta_tag: &str) -> Value {
    serde_json::json!({
        "action_type": DEEP_LINK_ACTION,
        "metaTag": meta_tag,
    })
}

// ── Inbound ───────────────────────────────────────────────────────────────────

/// An event frame received on the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// The channel is authorized.  A fresh token is present on first pairing.
    Connected { token: Option<String> },
    /// The user denied pairing on the television.
    Unauthorized,
    /// Anything else (`ms.channel.clientConnect`, `ed.edenTV.update`, …).
    Other { event: String },
}

#[derive(Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

impl ChannelEvent {
    /// Parses a text frame.  Returns `None` when the frame is not an event object.
    pub fn parse(text: &str) -> Option<Self> {
        let raw: RawEvent = serde_json::from_str(text).ok()?;
        let event = match raw.event.as_str() {
            CHANNEL_CONNECT_EVENT => ChannelEvent::Connected {
                token: extract_token(&raw.data),
            },
            CHANNEL_UNAUTHORIZED_EVENT => ChannelEvent::Unauthorized,
            _ => ChannelEvent::Other { event: raw.event },
        };
        Some(event)
    }
}

/// Tokens arrive as strings on most firmware and as bare numbers on some.
fn extract_token(data: &Value) -> Option<String> {
    match data.get("token")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
