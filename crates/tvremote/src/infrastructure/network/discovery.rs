//! Television discovery on the local network.
//!
//! Discovery is an ordered chain of [`DiscoveryStrategy`] implementations.
//! Each runs in turn and the first one that finds anything wins:
//!
//! 1. [`SsdpDiscovery`] multicasts an SSDP `M-SEARCH` for the remote-control
//!    receiver and collects the unicast replies.
//! 2. [`SubnetProbe`] asks every host of the local /24 for its device-info
//!    document on both control ports.
//!
//! # Why two strategies
//!
//! SSDP is cheap and passive but many routers drop multicast between Wi-Fi
//! and wired segments.  The subnet probe always works on a flat /24 at the
//! cost of ~500 short HTTP requests.
//!
//! Discovery never fails from the caller's point of view: every error is
//! logged at `debug` and degrades to an empty list.

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{FuturesUnordered, StreamExt};
use serde_json::Value;
use thiserror::Error;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info};
use tvremote_core::{ConnectionProfile, Device};

/// SSDP multicast group and port.
pub const SSDP_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(239, 255, 255, 250)), 1900);

/// Search target advertised by the television's remote-control receiver.
pub const SEARCH_TARGET: &str = "urn:samsung.com:device:RemoteControlReceiver:1";

/// Error type for discovery internals.  Never surfaces past [`DiscoveryService`].
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The UDP socket could not be bound.
    #[error("failed to bind discovery socket: {0}")]
    BindFailed(#[source] std::io::Error),
    /// The M-SEARCH datagram could not be sent.
    #[error("failed to send M-SEARCH: {0}")]
    Send(#[source] std::io::Error),
    /// The HTTP client for device-info requests could not be built.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    /// No usable local IPv4 address.
    #[error("no local IPv4 address: {0}")]
    NoLocalAddress(String),
}

/// One way of finding televisions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Returns whatever could be found within `window`.  Never fails.
    async fn discover(&self, window: Duration) -> Vec<Device>;
}

// ── Device-info document ──────────────────────────────────────────────────────

/// Fetches `/api/v2/` from a candidate address.
#[derive(Debug, Clone)]
pub struct DeviceInfoProbe {
    client: reqwest::Client,
}

impl DeviceInfoProbe {
    /// Builds a probe whose every request is bounded by `request_timeout`.
    /// The TLS port presents a self-signed certificate, which is accepted.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Http`] if the client cannot be built.
    pub fn new(request_timeout: Duration) -> Result<Self, DiscoveryError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, ip: IpAddr, profile: ConnectionProfile) -> Option<Device> {
        let response = self
            .client
            .get(profile.device_info_url(ip))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: Value = response.json().await.ok()?;
        parse_device_info(ip, &body)
    }
}

/// Builds a [`Device`] from a device-info document.
///
/// Accepts the name under `device.name` or top-level `name`; a document with
/// neither is not a television.  A parseable `device.ip` overrides `probed_ip`.
pub fn parse_device_info(probed_ip: IpAddr, body: &Value) -> Option<Device> {
    let device = body.get("device");
    let field = |key: &str| device.and_then(|d| d.get(key)).and_then(Value::as_str);

    let name = field("name").or_else(|| body.get("name").and_then(Value::as_str))?;
    let ip = field("ip")
        .and_then(|s| s.parse().ok())
        .unwrap_or(probed_ip);
    let mac = field("wifiMac").unwrap_or_default();

    Some(Device::new(ip, mac, name))
}

// ── SSDP ──────────────────────────────────────────────────────────────────────

/// The parts of an SSDP reply discovery cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdpResponse {
    pub ip: IpAddr,
    pub server: Option<String>,
}

/// Parses one unicast reply to our M-SEARCH.
///
/// Returns `None` for anything that is not a `200` reply, and for replies
/// whose `ST` names a different search target.
pub fn parse_ssdp_response(text: &str, source: IpAddr) -> Option<SsdpResponse> {
    let mut lines = text.lines();
    let status = lines.next()?;
    if !(status.starts_with("HTTP/1.1 200") || status.starts_with("HTTP/1.0 200")) {
        return None;
    }

    let mut server = None;
    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim().to_string();
        match key.trim().to_ascii_uppercase().as_str() {
            "ST" if value != SEARCH_TARGET => return None,
            "SERVER" => server = Some(value),
            _ => {}
        }
    }

    Some(SsdpResponse { ip: source, server })
}

fn m_search(mx_secs: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {SSDP_ADDR}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {mx_secs}\r\n\
         ST: {SEARCH_TARGET}\r\n\
         \r\n"
    )
}

/// Passive discovery via SSDP multicast.
pub struct SsdpDiscovery {
    info: DeviceInfoProbe,
}

impl SsdpDiscovery {
    pub fn new(info: DeviceInfoProbe) -> Self {
        Self { info }
    }

    async fn search(&self, window: Duration) -> Result<Vec<SsdpResponse>, DiscoveryError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(DiscoveryError::BindFailed)?;
        let mx = window.as_secs().clamp(1, 5);
        socket
            .send_to(m_search(mx).as_bytes(), SSDP_ADDR)
            .await
            .map_err(DiscoveryError::Send)?;

        let deadline = Instant::now() + window;
        let mut buf = [0u8; 2048];
        let mut seen = HashSet::new();
        let mut responses = Vec::new();

        loop {
            match timeout_at(deadline, socket.recv_from(&mut buf)).await {
                Ok(Ok((len, src))) => {
                    let text = String::from_utf8_lossy(&buf[..len]);
                    match parse_ssdp_response(&text, src.ip()) {
                        Some(reply) if seen.insert(reply.ip) => {
                            debug!("SSDP reply from {}", reply.ip);
                            responses.push(reply);
                        }
                        Some(_) => {}
                        None => debug!("ignoring unrelated SSDP datagram from {src}"),
                    }
                }
                Ok(Err(e)) => {
                    debug!("SSDP recv error: {e}");
                    break;
                }
                Err(_) => break,
            }
        }
        Ok(responses)
    }

    async fn enrich(&self, reply: SsdpResponse) -> Device {
        match self.info.fetch(reply.ip, ConnectionProfile::PLAIN).await {
            Some(device) => device,
            None => {
                let name = reply.server.unwrap_or_else(|| reply.ip.to_string());
                Device::new(reply.ip, "", name)
            }
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for SsdpDiscovery {
    fn name(&self) -> &'static str {
        "ssdp"
    }

    async fn discover(&self, window: Duration) -> Vec<Device> {
        let replies = match self.search(window).await {
            Ok(replies) => replies,
            Err(e) => {
                debug!("SSDP discovery unavailable: {e}");
                return Vec::new();
            }
        };
        futures_util::future::join_all(replies.into_iter().map(|r| self.enrich(r))).await
    }
}

// ── Subnet probe ──────────────────────────────────────────────────────────────

/// Every host address of the /24 containing `local`.
pub fn subnet_hosts(local: Ipv4Addr) -> impl Iterator<Item = Ipv4Addr> {
    let [a, b, c, _] = local.octets();
    (1..=254).map(move |d| Ipv4Addr::new(a, b, c, d))
}

fn local_ipv4() -> Result<Ipv4Addr, DiscoveryError> {
    match local_ip_address::local_ip() {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        Ok(IpAddr::V6(v6)) => Err(DiscoveryError::NoLocalAddress(format!(
            "only IPv6 available ({v6})"
        ))),
        Err(e) => Err(DiscoveryError::NoLocalAddress(e.to_string())),
    }
}

/// Active discovery: probes both control ports on every host of the local /24.
pub struct SubnetProbe {
    info: DeviceInfoProbe,
}

impl SubnetProbe {
    pub fn new(info: DeviceInfoProbe) -> Self {
        Self { info }
    }
}

#[async_trait]
impl DiscoveryStrategy for SubnetProbe {
    fn name(&self) -> &'static str {
        "subnet-probe"
    }

    /// Bounded by the per-request probe timeout, not by `window`.
    async fn discover(&self, _window: Duration) -> Vec<Device> {
        let local = match local_ipv4() {
            Ok(ip) => ip,
            Err(e) => {
                debug!("subnet probe skipped: {e}");
                return Vec::new();
            }
        };
        debug!("probing {local}/24");

        let mut probes = FuturesUnordered::new();
        for host in subnet_hosts(local) {
            for profile in ConnectionProfile::DEFAULT_ORDER {
                let info = self.info.clone();
                probes.push(async move { info.fetch(IpAddr::V4(host), profile).await });
            }
        }

        let mut found = Vec::new();
        while let Some(result) = probes.next().await {
            if let Some(device) = result {
                found.push(device);
            }
        }
        found
    }
}

// ── Strategy chain ────────────────────────────────────────────────────────────

/// Removes later entries that repeat an earlier ip.
pub fn dedupe_by_ip(devices: Vec<Device>) -> Vec<Device> {
    let mut seen = HashSet::new();
    devices.into_iter().filter(|d| seen.insert(d.ip)).collect()
}

/// Runs the strategies in order until one finds something.
pub struct DiscoveryService {
    strategies: Vec<Box<dyn DiscoveryStrategy>>,
}

impl DiscoveryService {
    pub fn new(strategies: Vec<Box<dyn DiscoveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// SSDP first, then the subnet probe.
    ///
    /// # Errors
    ///
    /// [`DiscoveryError::Http`] if the device-info client cannot be built.
    pub fn with_default_chain(probe_timeout: Duration) -> Result<Self, DiscoveryError> {
        let info = DeviceInfoProbe::new(probe_timeout)?;
        Ok(Self::new(vec![
            Box::new(SsdpDiscovery::new(info.clone())),
            Box::new(SubnetProbe::new(info)),
        ]))
    }

    pub async fn discover(&self, window: Duration) -> Vec<Device> {
        for strategy in &self.strategies {
            let found = dedupe_by_ip(strategy.discover(window).await);
            if !found.is_empty() {
                info!("{} found {} device(s)", strategy.name(), found.len());
                return found;
            }
            debug!("{} found nothing", strategy.name());
        }
        Vec::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_device_info_reads_nested_device_fields() {
        // Arrange
        let body = json!({
            "device": {
                "name": "[TV] Living Room",
                "wifiMac": "a0:b1:c2:d3:e4:f5",
                "ip": "192.168.1.50"
            },
            "name": "[TV] Samsung Q80"
        });

        // Act
        let device = parse_device_info(ip("192.168.1.50"), &body).expect("device");

        // Assert
        assert_eq!(device.friendly_name, "[TV] Living Room");
        assert_eq!(device.mac, "a0:b1:c2:d3:e4:f5");
    }

    #[test]
    fn test_parse_device_info_falls_back_to_top_level_name() {
        let device = parse_device_info(ip("10.0.0.7"), &json!({ "name": "Bedroom" })).unwrap();
        assert_eq!(device.friendly_name, "Bedroom");
        assert_eq!(device.ip, ip("10.0.0.7"));
        assert_eq!(device.mac, "");
    }

    #[test]
    fn test_parse_device_info_prefers_reported_ip() {
        let body = json!({ "device": { "name": "TV", "ip": "192.168.1.60" } });
        let device = parse_device_info(ip("192.168.1.50"), &body).unwrap();
        assert_eq!(device.ip, ip("192.168.1.60"));
    }

    #[test]
    fn test_parse_device_info_rejects_unrelated_documents() {
        assert!(parse_device_info(ip("10.0.0.1"), &json!({ "status": "ok" })).is_none());
        assert!(parse_device_info(ip("10.0.0.1"), &json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_parse_ssdp_response_extracts_headers_case_insensitively() {
        // Arrange
        let text = "HTTP/1.1 200 OK\r\n\
                    CACHE-CONTROL: max-age=1800\r\n\
                    location: http://192.168.1.50:7676/rcr/\r\n\
                    Server: SHP, UPnP/1.0, Samsung UPnP SDK/1.0\r\n\
                    ST: urn:samsung.com:device:RemoteControlReceiver:1\r\n\r\n";

        // Act
        let reply = parse_ssdp_response(text, ip("192.168.1.50")).expect("reply");

        // Assert
        assert_eq!(
            reply.server.as_deref(),
            Some("SHP, UPnP/1.0, Samsung UPnP SDK/1.0")
        );
    }

    #[test]
    fn test_parse_ssdp_response_rejects_other_targets_and_requests() {
        let other = "HTTP/1.1 200 OK\r\nST: urn:schemas-upnp-org:device:MediaRenderer:1\r\n\r\n";
        assert!(parse_ssdp_response(other, ip("10.0.0.1")).is_none());

        let echo = m_search(2);
        assert!(parse_ssdp_response(&echo, ip("10.0.0.1")).is_none());
    }

    #[test]
    fn test_m_search_names_target_and_group() {
        let msg = m_search(3);
        assert!(msg.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(msg.contains("HOST: 239.255.255.250:1900\r\n"));
        assert!(msg.contains("MX: 3\r\n"));
        assert!(msg.contains(&format!("ST: {SEARCH_TARGET}\r\n")));
        assert!(msg.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_subnet_hosts_covers_1_to_254() {
        let hosts: Vec<_> = subnet_hosts(Ipv4Addr::new(192, 168, 4, 23)).collect();
        assert_eq!(hosts.len(), 254);
        assert_eq!(hosts[0], Ipv4Addr::new(192, 168, 4, 1));
        assert_eq!(hosts[253], Ipv4Addr::new(192, 168, 4, 254));
    }

    #[test]
    fn test_dedupe_by_ip_keeps_first_occurrence() {
        let devices = vec![
            Device::new(ip("10.0.0.2"), "", "first"),
            Device::new(ip("10.0.0.3"), "", "other"),
            Device::new(ip("10.0.0.2"), "", "second"),
        ];
        let names: Vec<_> = dedupe_by_ip(devices)
            .into_iter()
            .map(|d| d.friendly_name)
            .collect();
        assert_eq!(names, vec!["first", "other"]);
    }

    fn strategy_returning(devices: Vec<Device>) -> MockDiscoveryStrategy {
        let mut mock = MockDiscoveryStrategy::new();
        mock.expect_name().return_const("mock");
        mock.expect_discover()
            .times(1)
            .returning(move |_| devices.clone());
        mock
    }

    #[tokio::test]
    async fn test_chain_stops_at_first_non_empty_strategy() {
        // Arrange
        let mut never = MockDiscoveryStrategy::new();
        never.expect_name().return_const("never");
        never.expect_discover().times(0);
        let service = DiscoveryService::new(vec![
            Box::new(strategy_returning(vec![])),
            Box::new(strategy_returning(vec![Device::new(ip("10.0.0.9"), "", "TV")])),
            Box::new(never),
        ]);

        // Act
        let found = service.discover(Duration::from_millis(10)).await;

        // Assert
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].ip, ip("10.0.0.9"));
    }

    #[tokio::test]
    async fn test_chain_dedupes_results() {
        let dup = Device::new(ip("10.0.0.9"), "", "TV");
        let service = DiscoveryService::new(vec![Box::new(strategy_returning(vec![
            dup.clone(),
            dup,
        ]))]);

        assert_eq!(service.discover(Duration::from_millis(10)).await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_chain_finds_nothing() {
        let service = DiscoveryService::new(vec![]);
        assert!(service.discover(Duration::from_millis(10)).await.is_empty());
    }
}
