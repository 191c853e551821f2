//! Frame-time scaled angular smoothing.
//!
//! A first-order low-pass filter over the circle. Each step moves the output
//! a fraction `speed * dt` of the shortest arc towards the target, so the
//! response is roughly independent of the host frame rate. Large frame times
//! saturate at `alpha = 1`, which snaps straight to the target.

use crate::wrap::{lerp_angle_wrap_around, normalize_360};

/// State for the angular smoothing filter.
///
/// # RT Safety
///
/// - `#[repr(C)]` for stable ABI
/// - No heap allocations
/// - O(1) time complexity
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SmoothingState {
    /// Interpolation speed in 1/s; higher is snappier, lower is smoother.
    pub speed: f32,
    /// When false the filter passes the target straight through.
    pub enabled: bool,
    /// Last output angle in `[0, 360)`.
    pub output: f32,
}

impl SmoothingState {
    /// Create an enabled smoothing state starting at 0°.
    ///
    /// # Example
    ///
    /// ```
    /// use anglelink_math::SmoothingState;
    ///
    /// let state = SmoothingState::new(15.0);
    /// assert!(state.enabled);
    /// ```
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            enabled: true,
            output: 0.0,
        }
    }

    /// Create a state from a speed and an on/off flag.
    pub fn with_enabled(speed: f32, enabled: bool) -> Self {
        Self {
            speed,
            enabled,
            output: 0.0,
        }
    }

    /// Alpha used for a step of `dt` seconds, clamped to `[0, 1]`.
    #[inline]
    pub fn alpha(&self, dt: f32) -> f32 {
        let alpha = self.speed * dt;
        if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        }
    }

    /// Jump the output to `angle` without filtering.
    pub fn snap_to(&mut self, angle: f32) {
        self.output = normalize_360(angle);
    }

    /// Reset the output to 0°.
    pub fn reset(&mut self) {
        self.output = 0.0;
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::new(15.0)
    }
}

/// Advance the smoothing filter by one frame and return the new output.
///
/// # Arguments
///
/// * `target` - Angle to move towards, in degrees (any range)
/// * `dt` - Frame time in seconds
/// * `state` - The filter state
///
/// # Example
///
/// ```
/// use anglelink_math::prelude::*;
///
/// let mut state = SmoothingState::new(10.0);
/// state.snap_to(350.0);
///
/// // Half a step across the seam lands near 0°, not near 180°.
/// let out = smoothing_filter(10.0, 0.05, &mut state);
/// assert!(out < 0.01 || out > 359.99);
/// ```
#[inline]
pub fn smoothing_filter(target: f32, dt: f32, state: &mut SmoothingState) -> f32 {
    state.output = if state.enabled {
        lerp_angle_wrap_around(state.output, target, state.alpha(dt))
    } else {
        normalize_360(target)
    };
    state.output
}
