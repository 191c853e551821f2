//! Host-side state for an anglelink sensor link.
//!
//! Everything here is owned by the foreground tick and is free of sockets and
//! threads:
//!
//! - [`config`]: [`LinkConfig`] and its YAML/JSON loading and validation
//! - [`connection`]: [`ConnectionTracker`], the liveness state machine
//! - [`events`]: [`LinkEvent`] and [`AngleOutputState`]
//! - [`orientation`]: the [`OrientationSink`] collaborator
//!
//! # Example
//!
//! ```
//! use anglelink_core::prelude::*;
//!
//! let config = LinkConfig::default();
//! let mut tracker = ConnectionTracker::new(config.discovery.connection_timeout_seconds);
//!
//! let connected = tracker.record_sample(Some("192.168.4.1:4210".into()));
//! assert_eq!(connected.map(|e| e.connected), Some(true));
//!
//! // 5.1 s of silence exceeds the default 5 s timeout
//! let lost = tracker.advance(5.1);
//! assert_eq!(lost.map(|e| e.connected), Some(false));
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod connection;
pub mod events;
pub mod orientation;
pub mod prelude;

pub use config::{
    Axis, ConfigError, DEFAULT_CONFIG_YAML, DiscoveryConfig, LinkConfig, ResolvedEndpoints,
    RotationConfig,
};
pub use connection::{ConnectionState, ConnectionTracker};
pub use events::{AngleOutputState, ConnectivityEvent, LinkEvent};
pub use orientation::{Orientation, OrientationSink};
