//! Angle sensor wire protocol: telemetry decoding and discovery constants.
//!
//! This crate is intentionally I/O-free and allocation-free. It provides pure
//! functions and constants that can be tested and fuzzed without sockets.
//!
//! ## Data channel
//!
//! The sensor sends one UDP datagram per reading to the host's data port:
//!
//! ```text
//! ┌────────────────────────────┬─────────────────────────┐
//! │  angle: f32 little-endian  │  trailing bytes ignored │
//! │          4 bytes           │        0..n bytes       │
//! └────────────────────────────┴─────────────────────────┘
//! ```
//!
//! The angle is in degrees and must lie in `[0, 360]`. Anything shorter than
//! four bytes or outside that range is rejected; nothing is clamped.
//!
//! ## Discovery channel
//!
//! The host broadcasts the eight ASCII bytes `DISCOVER` (no terminator) to the
//! sensor's discovery port. Replies are not parsed here; a sensor that has
//! found the host simply starts streaming on the data channel.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod discovery;
pub mod telemetry;

pub use discovery::DISCOVERY_TOKEN;
pub use telemetry::{
    ANGLE_MAX_DEG, ANGLE_MIN_DEG, ANGLE_PAYLOAD_LEN, DecodeError, decode_angle, encode_angle,
};

/// Default UDP port the host listens on for telemetry.
pub const DEFAULT_DATA_PORT: u16 = 5005;

/// Default UDP port the sensor listens on for discovery broadcasts.
pub const DEFAULT_DISCOVERY_PORT: u16 = 5006;

/// Largest datagram the receiver reads; longer datagrams are truncated by the
/// OS, which is harmless since only the first four bytes matter.
pub const MAX_DATAGRAM_LEN: usize = 1500;
