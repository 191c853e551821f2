//! Discovery broadcast payload.

/// Payload the host broadcasts so an unconfigured sensor can find it.
///
/// Eight ASCII bytes, no terminator; the sensor firmware matches it exactly.
pub const DISCOVERY_TOKEN: &[u8; 8] = b"DISCOVER";
