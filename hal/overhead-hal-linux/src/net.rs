//! Local address lookup

use std::net::{IpAddr, UdpSocket};

use tracing::trace;

/// Address of the interface that routes to the internet
///
/// Connecting a UDP socket only selects a route; no packet is sent.
pub fn local_ip() -> Option<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    let addr = socket.local_addr().ok()?.ip();
    trace!("Local address {}", addr);
    (!addr.is_unspecified()).then_some(addr)
}
