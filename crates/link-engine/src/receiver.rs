//! Background receive loop.
//!
//! The loop owns the data socket for its whole life and touches nothing but
//! [`ReceiverShared`]. It exits within one poll interval of `running` being
//! cleared.

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anglelink_atomic::{LinkCounters, SharedAngleSlot};
use anglelink_protocol::{MAX_DATAGRAM_LEN, decode_angle};
use parking_lot::Mutex;
use tracing::{debug, trace};

/// State crossing from the receive thread to the tick.
#[derive(Debug, Default)]
pub struct ReceiverShared {
    /// Newest accepted angle.
    pub slot: SharedAngleSlot,
    /// Sender of the newest accepted angle. Written before `slot` is published.
    pub peer: Mutex<Option<SocketAddr>>,
    pub counters: Arc<LinkCounters>,
}

/// Run until `running` is cleared.
pub fn receive_loop(socket: UdpSocket, shared: Arc<ReceiverShared>, running: Arc<AtomicBool>) {
    let mut buf = [0u8; MAX_DATAGRAM_LEN];
    debug!("receive loop started");

    while running.load(Ordering::Acquire) {
        match socket.recv_from(&mut buf) {
            Ok((len, src)) => {
                let payload = buf.get(..len).unwrap_or_default();
                handle_datagram(&shared, payload, src);
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
            Err(e) => debug!(error = %e, "data socket receive error"),
        }
    }

    debug!("receive loop exited");
}

fn handle_datagram(shared: &ReceiverShared, payload: &[u8], src: SocketAddr) {
    match decode_angle(payload) {
        Ok(angle) => {
            *shared.peer.lock() = Some(src);
            shared.slot.publish(angle);
            shared.counters.inc_accepted();
            trace!(%src, angle, "sample accepted");
        }
        Err(e) => {
            shared.counters.inc_rejected();
            trace!(%src, len = payload.len(), error = %e, "datagram dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anglelink_protocol::encode_angle;
    use std::net::{Ipv4Addr, SocketAddrV4};

    fn src() -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 40), 4210))
    }

    #[test]
    fn test_valid_datagram_is_published() {
        let shared = ReceiverShared::default();
        handle_datagram(&shared, &encode_angle(45.0), src());

        assert_eq!(shared.slot.take(), Some(45.0));
        assert_eq!(*shared.peer.lock(), Some(src()));
        assert_eq!(shared.counters.snapshot().datagrams_accepted, 1);
    }

    #[test]
    fn test_invalid_datagrams_are_counted_not_published() {
        let shared = ReceiverShared::default();
        handle_datagram(&shared, &[1, 2, 3], src());
        handle_datagram(&shared, &encode_angle(400.0), src());
        handle_datagram(&shared, &encode_angle(f32::NAN), src());

        assert_eq!(shared.slot.take(), None);
        assert_eq!(*shared.peer.lock(), None);
        assert_eq!(shared.counters.snapshot().datagrams_rejected, 3);
        assert_eq!(shared.counters.snapshot().datagrams_accepted, 0);
    }

    #[test]
    fn test_invalid_datagram_keeps_previous_sample() {
        let shared = ReceiverShared::default();
        handle_datagram(&shared, &encode_angle(90.0), src());
        handle_datagram(&shared, &[0xFF; 8], src());

        assert_eq!(shared.slot.take(), Some(90.0));
    }
}
