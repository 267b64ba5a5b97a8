//! ConnectionManager: owns the single live channel to the television.
//!
//! Lifecycle:
//!
//! ```text
//!  Disconnected ──connect()──▶ [handshake per profile] ──▶ Connected
//!       ▲                                                    │
//!       └──── disconnect() / device closes / write fails ────┘
//! ```
//!
//! `connect` and `disconnect` are serialized by `connect_lock`, so at most one
//! handshake is in flight.  The live state sits behind its own mutex and is
//! tagged with a generation number: a closure notice from an old channel
//! never clears a newer one.

use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tracing::{debug, info, warn};
use tvremote_core::{ConnectionProfile, ConnectionStatus, Device, RemoteError, SavedConnection};

use super::transport::{Dialer, HandshakeRequest, OutboundFrame, PairedChannel};
use crate::application::commands::RemoteChannel;
use crate::infrastructure::storage::SavedConnectionStore;

/// Tunables for the handshake.
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Name shown in the device's approval prompt.
    pub app_name: String,
    /// Upper bound for one profile attempt.
    pub handshake_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            app_name: "TV Remote".to_string(),
            handshake_timeout: Duration::from_secs(15),
        }
    }
}

/// Arguments of [`ConnectionManager::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub ip: IpAddr,
    pub mac: String,
    pub friendly_name: Option<String>,
    /// Pins the attempt to one port instead of trying every profile.
    pub port: Option<u16>,
}

impl ConnectRequest {
    pub fn new(ip: IpAddr, mac: impl Into<String>) -> Self {
        Self {
            ip,
            mac: mac.into(),
            friendly_name: None,
            port: None,
        }
    }
}

impl From<&SavedConnection> for ConnectRequest {
    fn from(saved: &SavedConnection) -> Self {
        Self {
            ip: saved.ip,
            mac: saved.mac.clone(),
            friendly_name: saved.friendly_name.clone(),
            port: None,
        }
    }
}

struct LiveChannel {
    device: Device,
    generation: u64,
    outbound: mpsc::Sender<OutboundFrame>,
    shutdown: oneshot::Sender<()>,
}

impl LiveChannel {
    /// The pump drops its receiver when it stops.
    fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }
}

/// The connection manager.  Shared by `Arc` with the command channel and the
/// smart search engine.
pub struct ConnectionManager {
    dialer: Arc<dyn Dialer>,
    store: SavedConnectionStore,
    settings: ConnectionSettings,
    live: Arc<Mutex<Option<LiveChannel>>>,
    /// Device of the last successful connect; survives an unexpected closure.
    device: Mutex<Option<Device>>,
    generation: AtomicU64,
    connect_lock: Mutex<()>,
}

impl ConnectionManager {
    pub fn new(
        dialer: Arc<dyn Dialer>,
        store: SavedConnectionStore,
        settings: ConnectionSettings,
    ) -> Self {
        Self {
            dialer,
            store,
            settings,
            live: Arc::new(Mutex::new(None)),
            device: Mutex::new(None),
            generation: AtomicU64::new(0),
            connect_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &SavedConnectionStore {
        &self.store
    }

    /// Opens a channel to `request.ip`, replacing any existing one.
    ///
    /// A saved token is presented only when it was issued by the same ip.
    ///
    /// # Errors
    ///
    /// - [`RemoteError::HandshakeRejected`] if any profile was declined.
    /// - Otherwise the error of the last profile attempted
    ///   ([`RemoteError::HandshakeTimeout`], [`RemoteError::ConnectFailed`]).
    pub async fn connect(&self, request: ConnectRequest) -> Result<Device, RemoteError> {
        let _guard = self.connect_lock.lock().await;
        self.teardown().await;

        let token = self
            .load_saved()
            .and_then(|saved| saved.token_for(request.ip).map(str::to_owned));
        let profiles: Vec<ConnectionProfile> = match request.port {
            Some(port) => vec![ConnectionProfile::for_port(port)],
            None => ConnectionProfile::DEFAULT_ORDER.to_vec(),
        };

        let mut rejected = false;
        let mut last_error = RemoteError::ConnectFailed("no connection profile attempted".into());

        for profile in profiles {
            let handshake = HandshakeRequest {
                ip: request.ip,
                profile,
                app_name: self.settings.app_name.clone(),
                token: token.clone(),
            };
            info!(
                "connecting to {}:{} ({}, token {})",
                request.ip,
                profile.port,
                if profile.secure { "wss" } else { "ws" },
                if token.is_some() { "present" } else { "absent" }
            );

            let attempt = timeout(self.settings.handshake_timeout, self.dialer.open(&handshake));
            let error = match attempt.await {
                Ok(Ok(channel)) => return Ok(self.install(request, token, channel).await),
                Ok(Err(e)) => e,
                Err(_) => RemoteError::HandshakeTimeout,
            };
            warn!("{}:{} handshake failed: {error}", request.ip, profile.port);
            rejected |= error == RemoteError::HandshakeRejected;
            last_error = error;
        }

        Err(if rejected {
            RemoteError::HandshakeRejected
        } else {
            last_error
        })
    }

    /// Reconnects to the saved device, if there is one.
    ///
    /// Returns `false` without touching the network when nothing is saved.
    pub async fn auto_reconnect(&self) -> bool {
        let Some(saved) = self.load_saved() else {
            debug!("auto-reconnect skipped: no saved connection");
            return false;
        };
        match self.connect(ConnectRequest::from(&saved)).await {
            Ok(_) => true,
            Err(e) => {
                warn!("auto-reconnect to {} failed: {e}", saved.ip);
                false
            }
        }
    }

    /// Closes the channel and forgets the device.  Safe to call repeatedly.
    pub async fn disconnect(&self) {
        let _guard = self.connect_lock.lock().await;
        self.teardown().await;
    }

    pub async fn status(&self) -> ConnectionStatus {
        match self.live.lock().await.as_ref().filter(|live| live.is_open()) {
            Some(live) => ConnectionStatus {
                connected: true,
                device: Some(live.device.clone()),
            },
            None => ConnectionStatus::disconnected(),
        }
    }

    /// `true` while a confirmed channel is open.
    pub async fn is_live(&self) -> bool {
        self.live
            .lock()
            .await
            .as_ref()
            .is_some_and(LiveChannel::is_open)
    }

    /// Device of the last successful connect, even if its channel has since closed.
    pub async fn current_device(&self) -> Option<Device> {
        self.device.lock().await.clone()
    }

    /// Writes one text frame to the live channel.
    ///
    /// A failed write clears the live state.
    ///
    /// # Errors
    ///
    /// [`RemoteError::NotConnected`] with no live channel;
    /// [`RemoteError::TransportClosed`] or [`RemoteError::Network`] if the
    /// write fails.
    pub async fn send_frame(&self, text: String) -> Result<(), RemoteError> {
        let (outbound, generation) = match self.live.lock().await.as_ref() {
            Some(live) => (live.outbound.clone(), live.generation),
            None => return Err(RemoteError::NotConnected),
        };

        let (done_tx, done_rx) = oneshot::channel();
        let result = match outbound.send(OutboundFrame { text, done: done_tx }).await {
            Ok(()) => done_rx.await.unwrap_or(Err(RemoteError::TransportClosed)),
            Err(_) => Err(RemoteError::TransportClosed),
        };

        if let Err(e) = &result {
            warn!("send failed, dropping channel: {e}");
            clear_generation(&self.live, generation).await;
        }
        result
    }

    async fn install(
        &self,
        request: ConnectRequest,
        presented_token: Option<String>,
        channel: PairedChannel,
    ) -> Device {
        let PairedChannel {
            token,
            outbound,
            closed,
            shutdown,
        } = channel;
        let token = token.or(presented_token);
        let device = Device::new(
            request.ip,
            request.mac.clone(),
            request.friendly_name.clone().unwrap_or_default(),
        );

        let record = SavedConnection {
            ip: request.ip,
            mac: request.mac,
            friendly_name: request.friendly_name,
            token,
        };
        if let Err(e) = self.store.save(&record) {
            warn!("could not persist connection: {e}");
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.live.lock().await = Some(LiveChannel {
            device: device.clone(),
            generation,
            outbound,
            shutdown,
        });
        *self.device.lock().await = Some(device.clone());

        let live = Arc::clone(&self.live);
        let ip = device.ip;
        tokio::spawn(async move {
            let reason = closed
                .await
                .unwrap_or_else(|_| "pump dropped".to_string());
            if clear_generation(&live, generation).await {
                info!("connection to {ip} closed: {reason}");
            }
        });

        info!("connected to {ip}");
        device
    }

    async fn teardown(&self) {
        self.device.lock().await.take();
        if let Some(live) = self.live.lock().await.take() {
            let _ = live.shutdown.send(());
            info!("disconnected from {}", live.device.ip);
        }
    }

    fn load_saved(&self) -> Option<SavedConnection> {
        match self.store.load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("ignoring saved connection: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl RemoteChannel for ConnectionManager {
    async fn is_live(&self) -> bool {
        ConnectionManager::is_live(self).await
    }

    async fn current_device(&self) -> Option<Device> {
        ConnectionManager::current_device(self).await
    }

    async fn send_frame(&self, text: String) -> Result<(), RemoteError> {
        ConnectionManager::send_frame(self, text).await
    }
}

/// Clears `live` if it still holds `generation`.  Returns whether it did.
async fn clear_generation(live: &Mutex<Option<LiveChannel>>, generation: u64) -> bool {
    let mut slot = live.lock().await;
    if slot.as_ref().is_some_and(|l| l.generation == generation) {
        *slot = None;
        true
    } else {
        false
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::sync::Mutex as StdMutex;

    use super::*;

    /// How the fake device answers one dial.
    enum DialOutcome {
        Accept(Option<String>),
        /// Confirms, then answers every write with this error.
        AcceptFailingWrites(RemoteError),
        /// Confirms, then the pump exits without reporting a closure.
        AcceptThenStop,
        Fail(RemoteError),
        Hang,
    }

    /// Records every handshake request and every frame written.
    #[derive(Default)]
    struct RecordingDialer {
        requests: StdMutex<Vec<HandshakeRequest>>,
        frames: Arc<StdMutex<Vec<String>>>,
        outcomes: StdMutex<VecDeque<DialOutcome>>,
        /// Lets a test simulate the device closing the channel.
        closers: StdMutex<Vec<oneshot::Sender<String>>>,
    }

    impl RecordingDialer {
        fn with_outcomes(outcomes: Vec<DialOutcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: StdMutex::new(outcomes.into()),
                ..Self::default()
            })
        }

        fn requests(&self) -> Vec<HandshakeRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn frames(&self) -> Vec<String> {
            self.frames.lock().unwrap().clone()
        }

        fn close_oldest(&self) {
            let closer = self.closers.lock().unwrap().remove(0);
            let _ = closer.send("closed by device".to_string());
        }
    }

    #[async_trait]
    impl Dialer for RecordingDialer {
        async fn open(&self, request: &HandshakeRequest) -> Result<PairedChannel, RemoteError> {
            self.requests.lock().unwrap().push(request.clone());
            let outcome = self
                .outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(DialOutcome::Accept(None));

            match outcome {
                DialOutcome::Fail(e) => Err(e),
                DialOutcome::Hang => std::future::pending().await,
                DialOutcome::AcceptFailingWrites(error) => {
                    let (outbound, mut rx) = mpsc::channel::<OutboundFrame>(8);
                    let (closed_tx, closed) = oneshot::channel();
                    let (shutdown, _shutdown_rx) = oneshot::channel();
                    tokio::spawn(async move {
                        while let Some(frame) = rx.recv().await {
                            let _ = frame.done.send(Err(error.clone()));
                        }
                    });
                    self.closers.lock().unwrap().push(closed_tx);
                    Ok(PairedChannel {
                        token: None,
                        outbound,
                        closed,
                        shutdown,
                    })
                }
                DialOutcome::AcceptThenStop => {
                    let (outbound, rx) = mpsc::channel::<OutboundFrame>(8);
                    let (closed_tx, closed) = oneshot::channel();
                    let (shutdown, _shutdown_rx) = oneshot::channel();
                    drop(rx);
                    self.closers.lock().unwrap().push(closed_tx);
                    Ok(PairedChannel {
                        token: None,
                        outbound,
                        closed,
                        shutdown,
                    })
                }
                DialOutcome::Accept(token) => {
                    let (outbound, mut rx) = mpsc::channel::<OutboundFrame>(8);
                    let (closed_tx, closed) = oneshot::channel();
                    let (shutdown, _shutdown_rx) = oneshot::channel();
                    let frames = Arc::clone(&self.frames);
                    tokio::spawn(async move {
                        while let Some(frame) = rx.recv().await {
                            frames.lock().unwrap().push(frame.text);
                            let _ = frame.done.send(Ok(()));
                        }
                    });
                    self.closers.lock().unwrap().push(closed_tx);
                    Ok(PairedChannel {
                        token,
                        outbound,
                        closed,
                        shutdown,
                    })
                }
            }
        }
    }

    fn temp_store(name: &str) -> (SavedConnectionStore, PathBuf) {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!(
            "tvremote_mgr_{name}_{}_{nanos}",
            std::process::id()
        ));
        (SavedConnectionStore::new(dir.join("connection.json")), dir)
    }

    fn manager(dialer: Arc<RecordingDialer>, store: SavedConnectionStore) -> ConnectionManager {
        ConnectionManager::new(dialer, store, ConnectionSettings::default())
    }

    fn tv() -> IpAddr {
        "192.168.1.50".parse().unwrap()
    }

    #[tokio::test]
    async fn test_first_connect_presents_no_token_and_persists_issued_one() {
        // Arrange
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::Accept(Some("111".into()))]);
        let (store, dir) = temp_store("first");
        let mgr = manager(Arc::clone(&dialer), store.clone());

        // Act
        let device = mgr
            .connect(ConnectRequest::new(tv(), "aa:bb:cc:dd:ee:ff"))
            .await
            .expect("connect");

        // Assert
        assert_eq!(device.ip, tv());
        assert_eq!(dialer.requests()[0].token, None);
        let saved = store.load().unwrap().expect("record saved");
        assert_eq!(saved.token.as_deref(), Some("111"));
        assert_eq!(saved.mac, "aa:bb:cc:dd:ee:ff");
        assert!(mgr.status().await.connected);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_reconnect_to_same_ip_presents_saved_token() {
        // Arrange
        let (store, dir) = temp_store("reuse");
        store
            .save(&SavedConnection {
                ip: tv(),
                mac: String::new(),
                friendly_name: None,
                token: Some("222".into()),
            })
            .unwrap();
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::Accept(None)]);
        let mgr = manager(Arc::clone(&dialer), store.clone());

        // Act
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        // Assert: token presented, and kept when the device issues none
        assert_eq!(dialer.requests()[0].token.as_deref(), Some("222"));
        assert_eq!(store.load().unwrap().unwrap().token.as_deref(), Some("222"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_connect_to_other_ip_presents_no_token() {
        let (store, dir) = temp_store("other_ip");
        store
            .save(&SavedConnection {
                ip: "10.0.0.2".parse().unwrap(),
                mac: String::new(),
                friendly_name: None,
                token: Some("333".into()),
            })
            .unwrap();
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let mgr = manager(Arc::clone(&dialer), store);

        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        assert_eq!(dialer.requests()[0].token, None);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_profiles_tried_secure_then_plain() {
        // Arrange
        let dialer = RecordingDialer::with_outcomes(vec![
            DialOutcome::Fail(RemoteError::ConnectFailed("refused".into())),
            DialOutcome::Accept(None),
        ]);
        let (store, dir) = temp_store("fallback");
        let mgr = manager(Arc::clone(&dialer), store);

        // Act
        let result = mgr.connect(ConnectRequest::new(tv(), "")).await;

        // Assert
        assert!(result.is_ok());
        let profiles: Vec<_> = dialer.requests().iter().map(|r| r.profile).collect();
        assert_eq!(profiles, ConnectionProfile::DEFAULT_ORDER.to_vec());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_explicit_port_makes_single_attempt() {
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::Fail(
            RemoteError::ConnectFailed("refused".into()),
        )]);
        let (store, _dir) = temp_store("explicit");
        let mgr = manager(Arc::clone(&dialer), store);

        let mut req = ConnectRequest::new(tv(), "");
        req.port = Some(8001);
        let result = mgr.connect(req).await;

        assert!(matches!(result, Err(RemoteError::ConnectFailed(_))));
        assert_eq!(dialer.requests().len(), 1);
        assert_eq!(dialer.requests()[0].profile, ConnectionProfile::PLAIN);
    }

    #[tokio::test]
    async fn test_rejection_is_preferred_over_later_failure() {
        let dialer = RecordingDialer::with_outcomes(vec![
            DialOutcome::Fail(RemoteError::HandshakeRejected),
            DialOutcome::Fail(RemoteError::ConnectFailed("refused".into())),
        ]);
        let (store, _dir) = temp_store("rejected");
        let mgr = manager(Arc::clone(&dialer), store);

        let result = mgr.connect(ConnectRequest::new(tv(), "")).await;

        assert_eq!(result, Err(RemoteError::HandshakeRejected));
        assert!(!mgr.status().await.connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unanswered_handshake_times_out() {
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::Hang, DialOutcome::Hang]);
        let (store, _dir) = temp_store("timeout");
        let mgr = manager(Arc::clone(&dialer), store);

        let result = mgr.connect(ConnectRequest::new(tv(), "")).await;

        assert_eq!(result, Err(RemoteError::HandshakeTimeout));
        assert_eq!(dialer.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_auto_reconnect_without_saved_record_does_no_io() {
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("auto_none");
        let mgr = manager(Arc::clone(&dialer), store);

        assert!(!mgr.auto_reconnect().await);
        assert!(dialer.requests().is_empty());
    }

    #[tokio::test]
    async fn test_auto_reconnect_uses_saved_record() {
        let (store, dir) = temp_store("auto_saved");
        store
            .save(&SavedConnection {
                ip: tv(),
                mac: "aa:bb:cc:dd:ee:ff".into(),
                friendly_name: Some("Den".into()),
                token: Some("444".into()),
            })
            .unwrap();
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let mgr = manager(Arc::clone(&dialer), store);

        assert!(mgr.auto_reconnect().await);
        assert_eq!(dialer.requests()[0].token.as_deref(), Some("444"));
        assert_eq!(
            mgr.current_device().await.map(|d| d.friendly_name),
            Some("Den".to_string())
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("disconnect");
        let mgr = manager(dialer, store);
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        mgr.disconnect().await;
        mgr.disconnect().await;

        assert_eq!(mgr.status().await, ConnectionStatus::disconnected());
        assert!(mgr.current_device().await.is_none());
    }

    #[tokio::test]
    async fn test_send_frame_without_channel_is_not_connected() {
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("not_connected");
        let mgr = manager(dialer, store);

        assert_eq!(
            mgr.send_frame("{}".into()).await,
            Err(RemoteError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_send_frame_reaches_channel() {
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("send");
        let mgr = manager(Arc::clone(&dialer), store);
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        tokio_test::assert_ok!(mgr.send_frame("hello".into()).await);

        assert_eq!(dialer.frames(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_write_clears_live_state() {
        // Arrange
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::AcceptFailingWrites(
            RemoteError::Network("broken pipe".into()),
        )]);
        let (store, _dir) = temp_store("write_fails");
        let mgr = manager(dialer, store);
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();
        assert!(mgr.status().await.connected);

        // Act
        let result = mgr.send_frame("hello".into()).await;

        // Assert
        assert_eq!(result, Err(RemoteError::Network("broken pipe".into())));
        assert!(!mgr.status().await.connected);
        assert!(!mgr.is_live().await);
        assert_eq!(
            mgr.send_frame("again".into()).await,
            Err(RemoteError::NotConnected)
        );
    }

    #[tokio::test]
    async fn test_status_agrees_with_is_live_once_pump_stops() {
        // Arrange: the pump is gone but no closure has been reported yet.
        let dialer = RecordingDialer::with_outcomes(vec![DialOutcome::AcceptThenStop]);
        let (store, _dir) = temp_store("pump_stopped");
        let mgr = manager(dialer, store);

        // Act
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        // Assert
        assert!(!mgr.is_live().await);
        assert!(!mgr.status().await.connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_device_closure_clears_live_state_but_keeps_device() {
        // Arrange
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("closure");
        let mgr = manager(Arc::clone(&dialer), store);
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        // Act
        dialer.close_oldest();
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Assert
        assert!(!mgr.status().await.connected);
        assert!(mgr.current_device().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_closure_does_not_clear_newer_channel() {
        // Arrange: two connects; the first channel's closure arrives late.
        let dialer = RecordingDialer::with_outcomes(vec![]);
        let (store, _dir) = temp_store("stale");
        let mgr = manager(Arc::clone(&dialer), store);
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();
        mgr.connect(ConnectRequest::new(tv(), "")).await.unwrap();

        // Act
        dialer.close_oldest();
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Assert
        assert!(mgr.status().await.connected);
    }
}
