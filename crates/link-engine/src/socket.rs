//! Socket construction.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use tracing::{debug, warn};

use crate::EngineError;

/// Receive buffer requested for the data socket. The kernel may cap it.
pub const RECV_BUFFER_BYTES: usize = 2 * 1024 * 1024;

/// Upper bound on how long the receive thread blocks before rechecking the
/// running flag.
pub const RECV_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bind the inbound telemetry socket.
///
/// Address reuse is enabled so a restarted host can rebind while the previous
/// socket lingers. Reads time out after [`RECV_POLL_INTERVAL`].
pub fn bind_data_socket(addr: SocketAddrV4) -> Result<UdpSocket, EngineError> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(EngineError::socket("create data socket"))?;
    socket
        .set_reuse_address(true)
        .map_err(EngineError::socket("enable address reuse"))?;

    if let Err(e) = socket.set_recv_buffer_size(RECV_BUFFER_BYTES) {
        warn!(requested = RECV_BUFFER_BYTES, error = %e, "could not enlarge receive buffer");
    } else if let Ok(actual) = socket.recv_buffer_size() {
        debug!(requested = RECV_BUFFER_BYTES, actual, "data socket receive buffer");
    }

    socket
        .bind(&SockAddr::from(addr))
        .map_err(EngineError::socket("bind data socket"))?;

    let socket: UdpSocket = socket.into();
    socket
        .set_read_timeout(Some(RECV_POLL_INTERVAL))
        .map_err(EngineError::socket("set data socket read timeout"))?;
    Ok(socket)
}

/// Bind an ephemeral, broadcast-capable, non-blocking socket for discovery.
pub fn bind_broadcast_socket() -> Result<UdpSocket, EngineError> {
    let socket = UdpSocket::bind(SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0)))
        .map_err(EngineError::socket("bind discovery socket"))?;
    socket
        .set_broadcast(true)
        .map_err(EngineError::socket("enable broadcast on discovery socket"))?;
    socket
        .set_nonblocking(true)
        .map_err(EngineError::socket("make discovery socket non-blocking"))?;
    Ok(socket)
}
