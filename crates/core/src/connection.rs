//! Connection liveness tracking.
//!
//! The tracker is driven entirely by the tick: [`ConnectionTracker::record_sample`]
//! when a sample was consumed, [`ConnectionTracker::advance`] when none was.
//! Both return an event only when the state actually changes.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::events::ConnectivityEvent;

/// Whether the sensor is currently considered alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Two-state liveness machine for the single tracked sensor.
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    state: ConnectionState,
    peer: Option<String>,
    time_since_last_packet: f32,
    timeout_seconds: f32,
}

impl ConnectionTracker {
    /// Start disconnected, declaring loss after `timeout_seconds` of silence.
    pub fn new(timeout_seconds: f32) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            peer: None,
            time_since_last_packet: 0.0,
            timeout_seconds,
        }
    }

    /// A sample was consumed this tick.
    ///
    /// Resets the silence timer in any state. Connects, recording `peer`, if
    /// the tracker was disconnected.
    pub fn record_sample(&mut self, peer: Option<String>) -> Option<ConnectivityEvent> {
        self.time_since_last_packet = 0.0;

        if self.state.is_connected() {
            return None;
        }

        info!(peer = peer.as_deref().unwrap_or("unknown"), "sensor connected");
        self.peer = peer;
        self.transition_to(ConnectionState::Connected)
    }

    /// A tick elapsed with no sample.
    ///
    /// Disconnects once the accumulated silence strictly exceeds the timeout.
    pub fn advance(&mut self, dt: f32) -> Option<ConnectivityEvent> {
        if dt.is_finite() && dt > 0.0 {
            self.time_since_last_packet += dt;
        }

        if self.state.is_connected() && self.time_since_last_packet > self.timeout_seconds {
            warn!(
                silence_s = self.time_since_last_packet,
                timeout_s = self.timeout_seconds,
                "sensor disconnected"
            );
            return self.disconnect();
        }
        None
    }

    /// Disconnect immediately, e.g. when the engine stops.
    pub fn force_disconnect(&mut self) -> Option<ConnectivityEvent> {
        if self.state.is_connected() {
            info!("sensor link closed");
        }
        self.disconnect()
    }

    /// Change the silence threshold. The running timer is kept.
    pub fn set_timeout(&mut self, timeout_seconds: f32) {
        self.timeout_seconds = timeout_seconds;
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Label of the connected peer, `None` while disconnected.
    pub fn peer(&self) -> Option<&str> {
        self.peer.as_deref()
    }

    /// Seconds of silence since the last sample.
    pub fn time_since_last_packet(&self) -> f32 {
        self.time_since_last_packet
    }

    fn disconnect(&mut self) -> Option<ConnectivityEvent> {
        let event = self.transition_to(ConnectionState::Disconnected);
        if event.is_some() {
            self.peer = None;
        }
        event
    }

    fn transition_to(&mut self, new_state: ConnectionState) -> Option<ConnectivityEvent> {
        if self.state == new_state {
            return None;
        }

        self.state = new_state;
        Some(ConnectivityEvent {
            connected: new_state.is_connected(),
            peer: self.peer.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> Option<String> {
        Some("192.168.1.50:4210".to_string())
    }

    #[test]
    fn test_starts_disconnected() {
        let tracker = ConnectionTracker::new(5.0);
        assert_eq!(tracker.state(), ConnectionState::Disconnected);
        assert_eq!(tracker.peer(), None);
    }

    #[test]
    fn test_first_sample_connects_once() {
        let mut tracker = ConnectionTracker::new(5.0);

        let event = tracker.record_sample(peer());
        assert_eq!(
            event,
            Some(ConnectivityEvent {
                connected: true,
                peer: peer(),
            })
        );
        assert!(tracker.is_connected());
        assert_eq!(tracker.peer(), Some("192.168.1.50:4210"));

        // Further samples do not re-emit
        assert_eq!(tracker.record_sample(peer()), None);
        assert_eq!(tracker.record_sample(None), None);
    }

    #[test]
    fn test_timeout_disconnects_once() {
        let mut tracker = ConnectionTracker::new(5.0);
        assert!(tracker.record_sample(peer()).is_some());

        let mut events = Vec::new();
        for _ in 0..60 {
            events.extend(tracker.advance(0.1));
        }

        assert_eq!(
            events,
            vec![ConnectivityEvent {
                connected: false,
                peer: peer(),
            }]
        );
        assert!(!tracker.is_connected());
        assert_eq!(tracker.peer(), None);
    }

    #[test]
    fn test_ticks_below_timeout_emit_nothing() {
        let mut tracker = ConnectionTracker::new(5.0);
        assert!(tracker.record_sample(peer()).is_some());

        for _ in 0..40 {
            assert_eq!(tracker.advance(0.1), None);
        }
        assert!(tracker.is_connected());
    }

    #[test]
    fn test_timeout_is_strict() {
        let mut tracker = ConnectionTracker::new(1.0);
        assert!(tracker.record_sample(peer()).is_some());

        assert_eq!(tracker.advance(1.0), None);
        assert!(tracker.advance(0.01).is_some());
    }

    #[test]
    fn test_sample_resets_timer() {
        let mut tracker = ConnectionTracker::new(1.0);
        assert!(tracker.record_sample(peer()).is_some());

        assert_eq!(tracker.advance(0.9), None);
        assert_eq!(tracker.record_sample(peer()), None);
        assert_eq!(tracker.advance(0.9), None);
        assert!(tracker.is_connected());
        assert!(tracker.time_since_last_packet() < 1.0);
    }

    #[test]
    fn test_silence_while_disconnected_is_harmless() {
        let mut tracker = ConnectionTracker::new(1.0);
        for _ in 0..100 {
            assert_eq!(tracker.advance(0.5), None);
        }
        // Reconnect still produces exactly one event
        assert!(tracker.record_sample(peer()).is_some());
    }

    #[test]
    fn test_force_disconnect() {
        let mut tracker = ConnectionTracker::new(5.0);
        assert_eq!(tracker.force_disconnect(), None);

        assert!(tracker.record_sample(peer()).is_some());
        let event = tracker.force_disconnect();
        assert_eq!(event.map(|e| e.connected), Some(false));
        assert_eq!(tracker.force_disconnect(), None);
    }

    #[test]
    fn test_non_finite_dt_ignored() {
        let mut tracker = ConnectionTracker::new(1.0);
        assert!(tracker.record_sample(peer()).is_some());
        assert_eq!(tracker.advance(f32::NAN), None);
        assert_eq!(tracker.advance(-5.0), None);
        assert!(tracker.is_connected());
    }
}
