//! Circular angle math for anglelink
//!
//! Telemetry angles are circular quantities: 0° and 360° describe the same
//! orientation. This crate provides the pure helpers the tick path needs to
//! treat them that way.
//!
//! # Overview
//!
//! - **Wrap**: normalization into `[0, 360)` and shortest signed deltas
//! - **Smoothing**: a first-order low-pass filter over the circle whose
//!   alpha is scaled by frame time
//!
//! # RT Safety
//!
//! Every function here is allocation-free, O(1), and free of I/O, so it can be
//! called from a host frame loop without budget concerns.
//!
//! # Example
//!
//! ```
//! use anglelink_math::prelude::*;
//!
//! // Crossing the 0/360 seam takes the short way round.
//! let halfway = lerp_angle_wrap_around(350.0, 10.0, 0.5);
//! assert!(halfway < 0.001 || halfway > 359.999);
//!
//! let mut state = SmoothingState::new(15.0);
//! let out = smoothing_filter(90.0, 1.0 / 60.0, &mut state);
//! assert!(out > 0.0 && out < 90.0);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod prelude;
pub mod smoothing;
pub mod wrap;

pub use smoothing::{SmoothingState, smoothing_filter};
pub use wrap::{FULL_TURN_DEG, HALF_TURN_DEG, lerp_angle_wrap_around, normalize_360, shortest_delta};
