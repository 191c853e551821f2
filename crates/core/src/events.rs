//! Events and output state published by the tick.

use serde::{Deserialize, Serialize};

/// Connection state change for the tracked sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityEvent {
    pub connected: bool,
    /// `ip:port` of the sender that established the connection.
    pub peer: Option<String>,
}

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LinkEvent {
    /// A new sample was consumed; carries the processed angle.
    AngleUpdated { angle: f32 },
    ConnectivityChanged {
        connected: bool,
        peer: Option<String>,
    },
}

impl From<ConnectivityEvent> for LinkEvent {
    fn from(event: ConnectivityEvent) -> Self {
        LinkEvent::ConnectivityChanged {
            connected: event.connected,
            peer: event.peer,
        }
    }
}

/// Angles and counters owned by the foreground tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleOutputState {
    /// Last accepted sample, as received.
    pub raw_angle: f32,
    /// `raw_angle` after multiplier, offset and wrap.
    pub processed_angle: f32,
    /// Low-pass filtered `processed_angle`; this is what gets applied.
    pub smoothed_angle: f32,
    /// Samples consumed by the tick. Overwritten samples are not counted.
    pub packets_received: u64,
}

impl AngleOutputState {
    /// Zero the angles, keeping the packet count.
    pub fn reset_angles(&mut self) {
        self.raw_angle = 0.0;
        self.processed_angle = 0.0;
        self.smoothed_angle = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_reset_angles_keeps_count() {
        let mut output = AngleOutputState {
            raw_angle: 10.0,
            processed_angle: 20.0,
            smoothed_angle: 15.0,
            packets_received: 7,
        };
        output.reset_angles();
        assert_eq!(
            output,
            AngleOutputState {
                packets_received: 7,
                ..AngleOutputState::default()
            }
        );
    }

    #[test]
    fn test_event_json_shape() -> TestResult {
        let json = serde_json::to_string(&LinkEvent::AngleUpdated { angle: 45.0 })?;
        assert_eq!(json, r#"{"event":"angle_updated","angle":45.0}"#);

        let event: LinkEvent = ConnectivityEvent {
            connected: true,
            peer: Some("10.0.0.2:4210".to_string()),
        }
        .into();
        let json = serde_json::to_string(&event)?;
        assert_eq!(
            json,
            r#"{"event":"connectivity_changed","connected":true,"peer":"10.0.0.2:4210"}"#
        );
        Ok(())
    }
}
