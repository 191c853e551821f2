//! # anglelink-atomic
//!
//! Lock-free primitives that cross the boundary between the background UDP
//! receive thread and the foreground tick.
//!
//! ## Guarantees
//!
//! - **No heap allocations**
//! - **No blocking operations**: every method is a handful of atomic
//!   instructions
//! - **No torn reads**: the slot packs value and fresh flag into one word
//!
//! ## Modules
//!
//! - [`slot`] - [`SharedAngleSlot`], a single-producer/single-consumer
//!   overwrite-on-write mailbox holding the newest angle
//! - [`counters`] - [`LinkCounters`], relaxed counters for datagrams and
//!   discovery traffic
//!
//! ## Usage
//!
//! ```rust
//! use anglelink_atomic::{LinkCounters, SharedAngleSlot};
//!
//! let slot = SharedAngleSlot::new();
//! let counters = LinkCounters::new();
//!
//! // receive thread
//! slot.publish(45.0);
//! counters.inc_accepted();
//!
//! // tick
//! assert_eq!(slot.take(), Some(45.0));
//! assert_eq!(slot.take(), None);
//! assert_eq!(counters.snapshot().datagrams_accepted, 1);
//! ```

#![no_std]
#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod counters;
pub mod prelude;
pub mod slot;

pub use counters::{LinkCounters, LinkCountersSnapshot};
pub use slot::SharedAngleSlot;
