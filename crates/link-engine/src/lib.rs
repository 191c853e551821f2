//! UDP discovery and receive engine for anglelink sensors.
//!
//! [`UdpReceiverEngine`] owns the data socket, a background receive thread
//! and a [`DiscoveryBroadcaster`]. The host drives it with
//! [`UdpReceiverEngine::tick`] once per frame and reads the smoothed angle,
//! connection state and events back out.
//!
//! ```text
//!  sensor ──UDP f32──► data socket ──► receive thread ──► SharedAngleSlot
//!                                                              │ take()
//!  sensor ◄─DISCOVER── discovery socket ◄── tick(dt) ◄─────────┘
//!                                              │
//!                                              ├─► ConnectionTracker
//!                                              ├─► rotation + smoothing
//!                                              └─► OrientationSink, events
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod discovery;
pub mod engine;
pub mod error;
pub mod receiver;
pub mod socket;

pub use discovery::DiscoveryBroadcaster;
pub use engine::{EVENT_CHANNEL_CAPACITY, UdpReceiverEngine};
pub use error::EngineError;
pub use socket::{RECV_BUFFER_BYTES, RECV_POLL_INTERVAL};
