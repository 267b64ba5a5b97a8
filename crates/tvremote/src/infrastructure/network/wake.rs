//! Wake-on-LAN for the saved television.
//!
//! Magic packet layout (102 bytes):
//!
//! ```text
//! FF FF FF FF FF FF | MAC × 16
//! ```
//!
//! Sent as a UDP broadcast to port 9, a few times in a row since a single
//! datagram to a sleeping NIC is easily lost.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, info};
use tvremote_core::RemoteError;

use crate::infrastructure::storage::SavedConnectionStore;

const WAKE_TARGET: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::BROADCAST),
    9,
);
const WAKE_REPEATS: usize = 3;
const WAKE_INTERVAL: Duration = Duration::from_millis(100);

/// Parses `aa:bb:cc:dd:ee:ff` (or `-`-separated) into six bytes.
///
/// # Errors
///
/// [`RemoteError::Network`] for anything that is not six hex octets.
pub fn parse_mac(mac: &str) -> Result<[u8; 6], RemoteError> {
    let invalid = || RemoteError::Network(format!("invalid MAC address {mac:?}"));
    let parts: Vec<&str> = mac.trim().split([':', '-']).collect();
    if parts.len() != 6 {
        return Err(invalid());
    }

    let mut bytes = [0u8; 6];
    for (slot, part) in bytes.iter_mut().zip(parts) {
        if part.len() != 2 {
            return Err(invalid());
        }
        *slot = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
    }
    Ok(bytes)
}

/// Builds the 102-byte magic packet for `mac`.
///
/// # Errors
///
/// See [`parse_mac`].
pub fn magic_packet(mac: &str) -> Result<Vec<u8>, RemoteError> {
    let mac = parse_mac(mac)?;
    let mut packet = vec![0xFF; 6];
    for _ in 0..16 {
        packet.extend_from_slice(&mac);
    }
    Ok(packet)
}

/// Broadcasts the magic packet for `mac`.
///
/// # Errors
///
/// [`RemoteError::Network`] for an invalid MAC or a socket failure.
pub async fn send_wake(mac: &str) -> Result<(), RemoteError> {
    let packet = magic_packet(mac)?;
    let network = |e: std::io::Error| RemoteError::Network(e.to_string());

    let socket = UdpSocket::bind("0.0.0.0:0").await.map_err(network)?;
    socket.set_broadcast(true).map_err(network)?;

    for attempt in 1..=WAKE_REPEATS {
        socket.send_to(&packet, WAKE_TARGET).await.map_err(network)?;
        debug!("wake packet {attempt}/{WAKE_REPEATS} sent for {mac}");
        if attempt < WAKE_REPEATS {
            tokio::time::sleep(WAKE_INTERVAL).await;
        }
    }
    Ok(())
}

/// Wakes the device of the saved connection.
///
/// # Errors
///
/// [`RemoteError::NotFound`] when nothing is saved, otherwise see [`send_wake`].
pub async fn wake_saved(store: &SavedConnectionStore) -> Result<(), RemoteError> {
    let saved = store
        .load()
        .map_err(|e| RemoteError::Network(e.to_string()))?
        .ok_or_else(|| RemoteError::NotFound("saved connection".to_string()))?;

    send_wake(&saved.mac).await?;
    info!("wake signal sent to {} ({})", saved.ip, saved.mac);
    Ok(())
}
