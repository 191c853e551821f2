//! Prelude for the angle math crate.
//!
//! ```
//! use anglelink_math::prelude::*;
//!
//! assert!((normalize_360(-90.0) - 270.0).abs() < 1e-4);
//! ```

pub use crate::smoothing::{SmoothingState, smoothing_filter};
pub use crate::wrap::{
    FULL_TURN_DEG, HALF_TURN_DEG, lerp_angle_wrap_around, normalize_360, shortest_delta,
};
