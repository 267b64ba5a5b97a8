//! REST side door of the device: app launch and the deep-link fallback.
//!
//! Both calls are `POST http://<ip>:8001/api/v2/applications/<id>`; the
//! deep link adds a JSON body.  Neither needs the WebSocket channel.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use tvremote_core::protocol::{messages::deep_link_rest_body, profile::app_launch_url};
use tvremote_core::RemoteError;

use crate::application::commands::DeviceRest;

/// [`DeviceRest`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpDeviceRest {
    client: reqwest::Client,
}

impl HttpDeviceRest {
    /// # Errors
    ///
    /// [`RemoteError::Network`] if the HTTP client cannot be built.
    pub fn new(request_timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| RemoteError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    async fn post(&self, url: String, body: Option<Value>) -> Result<(), RemoteError> {
        debug!("POST {url}");
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(RemoteError::Network(failure_message(status.as_u16(), &text)))
    }
}

#[async_trait]
impl DeviceRest for HttpDeviceRest {
    async fn launch_app(&self, ip: IpAddr, app_id: &str) -> Result<(), RemoteError> {
        self.post(app_launch_url(ip, app_id), None).await
    }

    async fn deep_link(&self, ip: IpAddr, app_id: &str, meta_tag: &str) -> Result<(), RemoteError> {
        self.post(app_launch_url(ip, app_id), Some(deep_link_rest_body(meta_tag)))
            .await
    }
}

/// The device's `message` field when the error body has one.
fn failure_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| format!("device returned HTTP {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_device_message() {
        assert_eq!(
            failure_message(404, r#"{"code":404,"message":"app not installed"}"#),
            "app not installed"
        );
    }

    #[test]
    fn test_failure_message_falls_back_to_status() {
        assert_eq!(failure_message(500, "<html>"), "device returned HTTP 500");
        assert_eq!(failure_message(404, r#"{"code":404}"#), "device returned HTTP 404");
    }

    #[test]
    fn test_http_device_rest_builds() {
        assert!(HttpDeviceRest::new(Duration::from_secs(1)).is_ok());
    }
}
