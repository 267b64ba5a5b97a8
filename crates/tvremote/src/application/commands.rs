//! Command channel: keys, text, app launch and deep-link casting.
//!
//! Translates user-level requests into wire frames (sent over the live
//! channel) or REST calls (sent to the associated device).  The two
//! dependencies are traits so the use cases can be tested without a socket:
//!
//! - [`RemoteChannel`] is implemented by the connection manager.
//! - [`DeviceRest`] is implemented by the HTTP client in `infrastructure`.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use tvremote_core::{
    resolve_app_id, resolve_key, resolve_launch_id, Device, KeyEntry, RemoteCommand, RemoteError,
    KEY_TABLE,
};

/// The live remote-control channel.
#[async_trait]
pub trait RemoteChannel: Send + Sync {
    async fn is_live(&self) -> bool;

    /// Device of the last successful connect.
    async fn current_device(&self) -> Option<Device>;

    async fn send_frame(&self, text: String) -> Result<(), RemoteError>;
}

/// Device REST operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRest: Send + Sync {
    /// Starts `app_id` on the device.
    async fn launch_app(&self, ip: IpAddr, app_id: &str) -> Result<(), RemoteError>;

    /// Starts `app_id` with a deep-link `meta_tag`.
    async fn deep_link(&self, ip: IpAddr, app_id: &str, meta_tag: &str)
        -> Result<(), RemoteError>;
}

/// The subset of commands smart search drives.
#[async_trait]
pub trait RemoteControl: Send + Sync {
    async fn is_live(&self) -> bool;
    async fn send_key(&self, key: &str) -> Result<String, RemoteError>;
    async fn send_text(&self, text: &str) -> Result<(), RemoteError>;
    async fn cast_to_tv(
        &self,
        app_name: &str,
        content_id: &str,
        meta_tag: Option<&str>,
    ) -> Result<(), RemoteError>;
}

/// Command use cases over a channel and the device REST API.
pub struct CommandChannel {
    channel: Arc<dyn RemoteChannel>,
    rest: Arc<dyn DeviceRest>,
}

impl CommandChannel {
    pub fn new(channel: Arc<dyn RemoteChannel>, rest: Arc<dyn DeviceRest>) -> Self {
        Self { channel, rest }
    }

    /// Sends a key press.  Returns the code that went on the wire.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotConnected`] without a live channel, or the channel's
    /// write error.
    pub async fn send_key(&self, key: &str) -> Result<String, RemoteError> {
        let code = resolve_key(key);
        self.channel
            .send_frame(RemoteCommand::Key { code: code.clone() }.to_frame())
            .await?;
        debug!("key {code} sent");
        Ok(code)
    }

    /// Types `text` into the focused input field.
    ///
    /// # Errors
    ///
    /// Same as [`CommandChannel::send_key`].
    pub async fn send_text(&self, text: &str) -> Result<(), RemoteError> {
        self.channel
            .send_frame(
                RemoteCommand::Text {
                    text: text.to_string(),
                }
                .to_frame(),
            )
            .await?;
        debug!("text input sent ({} chars)", text.chars().count());
        Ok(())
    }

    /// Launches an app by name, or by raw numeric id.  Returns the id launched.
    ///
    /// Needs an associated device but not a live channel.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::UnknownApp`] for a name that is neither in the table
    ///   nor numeric.
    /// - [`RemoteError::NotConnected`] with no associated device.
    /// - [`RemoteError::Network`] if the device refuses.
    pub async fn launch_app(&self, app_name: &str) -> Result<String, RemoteError> {
        let app_id = resolve_launch_id(app_name)?;
        let device = self
            .channel
            .current_device()
            .await
            .ok_or(RemoteError::NotConnected)?;

        self.rest.launch_app(device.ip, &app_id).await?;
        info!("launched {app_name} ({app_id}) on {}", device.ip);
        Ok(app_id)
    }

    /// Opens `content_id` inside `app_name`.
    ///
    /// The deep link goes over the channel first and falls back to REST.
    /// `meta_tag` overrides `content_id` as the tag sent to the app.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::UnknownApp`] unless the name is in the app table,
    ///   checked before anything else.
    /// - [`RemoteError::NotConnected`] without a live channel and device.
    /// - The REST error when both paths fail.
    pub async fn cast_to_tv(
        &self,
        app_name: &str,
        content_id: &str,
        meta_tag: Option<&str>,
    ) -> Result<(), RemoteError> {
        let app_id = resolve_app_id(app_name)?;
        if !self.channel.is_live().await {
            return Err(RemoteError::NotConnected);
        }
        let device = self
            .channel
            .current_device()
            .await
            .ok_or(RemoteError::NotConnected)?;

        let tag = meta_tag.unwrap_or(content_id);
        let frame = RemoteCommand::DeepLink {
            app_id: app_id.to_string(),
            meta_tag: tag.to_string(),
        }
        .to_frame();

        match self.channel.send_frame(frame).await {
            Ok(()) => {
                info!("cast {tag:?} to {app_name} over channel");
                Ok(())
            }
            Err(e) => {
                warn!("deep link over channel failed ({e}), trying REST");
                self.rest.deep_link(device.ip, app_id, tag).await?;
                info!("cast {tag:?} to {app_name} over REST");
                Ok(())
            }
        }
    }

    /// The symbolic key table, in display order.
    pub fn list_keys() -> &'static [KeyEntry] {
        KEY_TABLE
    }
}

#[async_trait]
impl RemoteControl for CommandChannel {
    async fn is_live(&self) -> bool {
        self.channel.is_live().await
    }

    async fn send_key(&self, key: &str) -> Result<String, RemoteError> {
        CommandChannel::send_key(self, key).await
    }

    async fn send_text(&self, text: &str) -> Result<(), RemoteError> {
        CommandChannel::send_text(self, text).await
    }

    async fn cast_to_tv(
        &self,
        app_name: &str,
        content_id: &str,
        meta_tag: Option<&str>,
    ) -> Result<(), RemoteError> {
        CommandChannel::cast_to_tv(self, app_name, content_id, meta_tag).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
