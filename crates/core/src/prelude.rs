//! Common imports for hosts embedding the link state.

pub use crate::config::{Axis, ConfigError, DiscoveryConfig, LinkConfig, RotationConfig};
pub use crate::connection::{ConnectionState, ConnectionTracker};
pub use crate::events::{AngleOutputState, ConnectivityEvent, LinkEvent};
pub use crate::orientation::{Orientation, OrientationSink};
