//! Wrap-around helpers for angles in degrees.

/// One full turn in degrees.
pub const FULL_TURN_DEG: f32 = 360.0;

/// Half a turn in degrees; the longest shortest-path between two angles.
pub const HALF_TURN_DEG: f32 = 180.0;

/// Map any angle in degrees into `[0, 360)`.
///
/// Negative inputs and inputs beyond a full turn are folded with a true
/// (Euclidean) modulo. Non-finite inputs map to `0.0`.
///
/// # Example
///
/// ```
/// use anglelink_math::normalize_360;
///
/// assert!((normalize_360(370.0) - 10.0).abs() < 1e-4);
/// assert!((normalize_360(-10.0) - 350.0).abs() < 1e-4);
/// assert!(normalize_360(360.0).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_360(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }

    let wrapped = angle.rem_euclid(FULL_TURN_DEG);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0 in f32
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}

/// Signed shortest rotation from `current` to `target`, in `(-180, 180]`.
///
/// # Example
///
/// ```
/// use anglelink_math::shortest_delta;
///
/// assert!((shortest_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
/// assert!((shortest_delta(10.0, 350.0) + 20.0).abs() < 1e-4);
/// ```
#[inline]
pub fn shortest_delta(current: f32, target: f32) -> f32 {
    let forward = normalize_360(target - current);
    if forward > HALF_TURN_DEG {
        forward - FULL_TURN_DEG
    } else {
        forward
    }
}

/// Interpolate from `current` towards `target` along the shorter arc.
///
/// `alpha` is clamped to `[0, 1]` (NaN counts as 0). The result is always in
/// `[0, 360)`: `alpha = 0` yields `current` normalized and `alpha = 1` yields
/// `target` normalized.
///
/// # Example
///
/// ```
/// use anglelink_math::lerp_angle_wrap_around;
///
/// // 350° -> 10° moves forward through 0°, not backwards through 180°.
/// let quarter = lerp_angle_wrap_around(350.0, 10.0, 0.25);
/// assert!((quarter - 355.0).abs() < 1e-3);
/// ```
#[inline]
pub fn lerp_angle_wrap_around(current: f32, target: f32, alpha: f32) -> f32 {
    let alpha = if alpha.is_nan() {
        0.0
    } else {
        alpha.clamp(0.0, 1.0)
    };

    let delta = shortest_delta(current, target);
    normalize_360(current + delta * alpha)
}
