//! Orientation collaborator.
//!
//! The engine never owns the thing being rotated. It hands the smoothed angle
//! to an [`OrientationSink`] supplied by the host.

use serde::{Deserialize, Serialize};

use crate::config::Axis;

/// Receives the smoothed angle each tick when auto-apply is enabled.
pub trait OrientationSink: Send {
    fn apply_orientation(&mut self, axis: Axis, angle_degrees: f32);
}

impl<F> OrientationSink for F
where
    F: FnMut(Axis, f32) + Send,
{
    fn apply_orientation(&mut self, axis: Axis, angle_degrees: f32) {
        self(axis, angle_degrees);
    }
}

/// Euler rotation in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    /// Copy of `self` with the component for `axis` replaced.
    ///
    /// X maps to roll, Y to pitch and Z to yaw.
    #[must_use]
    pub fn with_axis_angle(self, axis: Axis, angle_degrees: f32) -> Self {
        match axis {
            Axis::X => Self {
                roll: angle_degrees,
                ..self
            },
            Axis::Y => Self {
                pitch: angle_degrees,
                ..self
            },
            Axis::Z => Self {
                yaw: angle_degrees,
                ..self
            },
        }
    }

    /// The component `axis` maps to.
    pub fn axis_angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.roll,
            Axis::Y => self.pitch,
            Axis::Z => self.yaw,
        }
    }
}

impl OrientationSink for Orientation {
    fn apply_orientation(&mut self, axis: Axis, angle_degrees: f32) {
        *self = self.with_axis_angle(axis, angle_degrees);
    }
}
