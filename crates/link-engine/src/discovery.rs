//! Periodic discovery broadcast.
//!
//! The broadcaster is driven by the host tick rather than its own timer, so
//! it never runs on the receive thread and needs no synchronisation beyond
//! the shared counters.

use std::net::{SocketAddrV4, UdpSocket};
use std::sync::Arc;

use anglelink_atomic::LinkCounters;
use anglelink_protocol::DISCOVERY_TOKEN;
use tracing::{debug, trace};

use crate::EngineError;
use crate::socket::bind_broadcast_socket;

/// Sends [`DISCOVERY_TOKEN`] to a fixed target every `interval_seconds`.
///
/// Sends are best-effort: a failed send is counted and logged, and the next
/// interval simply tries again.
#[derive(Debug)]
pub struct DiscoveryBroadcaster {
    socket: UdpSocket,
    target: SocketAddrV4,
    interval_seconds: f32,
    elapsed_seconds: f32,
    counters: Arc<LinkCounters>,
}

impl DiscoveryBroadcaster {
    /// Bind an outbound broadcast socket.
    ///
    /// # Errors
    ///
    /// [`EngineError::Socket`] if the socket cannot be bound or the platform
    /// refuses broadcast permission.
    pub fn bind(
        target: SocketAddrV4,
        interval_seconds: f32,
        counters: Arc<LinkCounters>,
    ) -> Result<Self, EngineError> {
        let socket = bind_broadcast_socket()?;
        debug!(dest = %target, interval_s = interval_seconds, "discovery socket bound");
        Ok(Self {
            socket,
            target,
            interval_seconds,
            elapsed_seconds: 0.0,
            counters,
        })
    }

    /// Advance the interval timer and broadcast when it is due.
    ///
    /// Returns true if a datagram was handed to the OS this call.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed_seconds += dt;
        if self.elapsed_seconds < self.interval_seconds {
            return false;
        }

        self.elapsed_seconds = 0.0;
        match self.send_now() {
            Ok(()) => true,
            Err(e) => {
                debug!(dest = %self.target, error = %e, "discovery send failed");
                false
            }
        }
    }

    /// Broadcast immediately, outside the interval timer.
    ///
    /// Does not reset the timer.
    ///
    /// # Errors
    ///
    /// The underlying send error. It is also counted as a failed discovery.
    pub fn send_now(&self) -> std::io::Result<()> {
        match self.socket.send_to(DISCOVERY_TOKEN, self.target) {
            Ok(_) => {
                self.counters.inc_discovery_sent();
                trace!(dest = %self.target, "discovery sent");
                Ok(())
            }
            Err(e) => {
                self.counters.inc_discovery_failed();
                Err(e)
            }
        }
    }

    pub fn target(&self) -> SocketAddrV4 {
        self.target
    }
}
