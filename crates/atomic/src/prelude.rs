//! Prelude for anglelink-atomic.
//!
//! ```rust
//! use anglelink_atomic::prelude::*;
//!
//! let slot = SharedAngleSlot::new();
//! slot.publish(10.0);
//! assert!(slot.is_fresh());
//! ```

pub use crate::counters::{LinkCounters, LinkCountersSnapshot};
pub use crate::slot::SharedAngleSlot;
