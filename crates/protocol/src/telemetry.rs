//! Telemetry datagram decoding.
//!
//! All functions are pure and allocation-free.

use thiserror::Error;

/// Number of leading payload bytes that carry the angle.
pub const ANGLE_PAYLOAD_LEN: usize = 4;

/// Smallest accepted angle in degrees.
pub const ANGLE_MIN_DEG: f32 = 0.0;

/// Largest accepted angle in degrees (inclusive; 360 is the same orientation as 0).
pub const ANGLE_MAX_DEG: f32 = 360.0;

/// Why a telemetry datagram was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum DecodeError {
    /// Fewer than [`ANGLE_PAYLOAD_LEN`] bytes were received.
    #[error("telemetry payload too short: {len} bytes, need 4")]
    InsufficientData {
        /// Length of the rejected payload.
        len: usize,
    },

    /// The decoded value is NaN or outside `[0, 360]`.
    #[error("angle {value} outside [0, 360]")]
    OutOfRange {
        /// The decoded value.
        value: f32,
    },
}

/// Decode the angle carried by a telemetry datagram.
///
/// The first four bytes are read as a little-endian IEEE-754 `f32`; any
/// further bytes are ignored so the sensor can append fields later.
///
/// # Errors
///
/// - [`DecodeError::InsufficientData`] if `payload` is shorter than four bytes.
/// - [`DecodeError::OutOfRange`] if the value is NaN or not in `[0, 360]`.
///
/// # Example
///
/// ```
/// use anglelink_protocol::decode_angle;
///
/// let payload = 45.0f32.to_le_bytes();
/// assert_eq!(decode_angle(&payload), Ok(45.0));
/// ```
pub fn decode_angle(payload: &[u8]) -> Result<f32, DecodeError> {
    let Some(bytes) = payload.first_chunk::<ANGLE_PAYLOAD_LEN>() else {
        return Err(DecodeError::InsufficientData { len: payload.len() });
    };

    let value = f32::from_le_bytes(*bytes);

    // NaN fails both comparisons and is rejected here as well
    if (ANGLE_MIN_DEG..=ANGLE_MAX_DEG).contains(&value) {
        Ok(value)
    } else {
        Err(DecodeError::OutOfRange { value })
    }
}

/// Encode an angle the way the sensor firmware does.
///
/// Used by simulated sensors and tests; no range check is applied so callers
/// can produce deliberately invalid datagrams.
pub fn encode_angle(angle_deg: f32) -> [u8; ANGLE_PAYLOAD_LEN] {
    angle_deg.to_le_bytes()
}
