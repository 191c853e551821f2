//! Atomic counters for link traffic.
//!
//! [`LinkCounters`] is shared between the receive thread (datagram counters)
//! and the foreground tick (discovery counters). All updates use
//! `Ordering::Relaxed`: each counter is independent and only needs to be
//! eventually consistent.

use core::sync::atomic::{AtomicU64, Ordering};

/// Counter snapshot returned by [`LinkCounters::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkCountersSnapshot {
    /// Datagrams that decoded to a valid angle and were published
    pub datagrams_accepted: u64,
    /// Datagrams dropped by the decoder (short or out of range)
    pub datagrams_rejected: u64,
    /// Discovery broadcasts handed to the OS
    pub discovery_sent: u64,
    /// Discovery broadcasts that failed to send
    pub discovery_failed: u64,
}

impl LinkCountersSnapshot {
    /// Total datagrams seen on the data socket.
    #[must_use]
    pub fn datagrams_total(&self) -> u64 {
        self.datagrams_accepted
            .saturating_add(self.datagrams_rejected)
    }
}

/// Relaxed atomic counters for the data and discovery channels.
///
/// # Example
///
/// ```rust
/// use anglelink_atomic::LinkCounters;
///
/// let counters = LinkCounters::new();
/// counters.inc_accepted();
/// counters.inc_rejected();
/// counters.inc_discovery_sent();
///
/// let snapshot = counters.snapshot();
/// assert_eq!(snapshot.datagrams_total(), 2);
/// assert_eq!(snapshot.discovery_sent, 1);
/// ```
#[derive(Debug)]
pub struct LinkCounters {
    datagrams_accepted: AtomicU64,
    datagrams_rejected: AtomicU64,
    discovery_sent: AtomicU64,
    discovery_failed: AtomicU64,
}

impl Default for LinkCounters {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkCounters {
    /// Create counters initialized to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            datagrams_accepted: AtomicU64::new(0),
            datagrams_rejected: AtomicU64::new(0),
            discovery_sent: AtomicU64::new(0),
            discovery_failed: AtomicU64::new(0),
        }
    }

    /// Record a datagram that decoded to a valid angle.
    #[inline]
    pub fn inc_accepted(&self) {
        self.datagrams_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a datagram the decoder rejected.
    #[inline]
    pub fn inc_rejected(&self) {
        self.datagrams_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discovery broadcast that was sent.
    #[inline]
    pub fn inc_discovery_sent(&self) {
        self.discovery_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discovery broadcast that failed.
    #[inline]
    pub fn inc_discovery_failed(&self) {
        self.discovery_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters.
    ///
    /// There is no atomic snapshot across counters; each field is read
    /// independently.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> LinkCountersSnapshot {
        LinkCountersSnapshot {
            datagrams_accepted: self.datagrams_accepted.load(Ordering::Relaxed),
            datagrams_rejected: self.datagrams_rejected.load(Ordering::Relaxed),
            discovery_sent: self.discovery_sent.load(Ordering::Relaxed),
            discovery_failed: self.discovery_failed.load(Ordering::Relaxed),
        }
    }

}
