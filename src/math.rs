//! Angle and interpolation helpers shared by the vehicle and encounter code.
//!
//! Headings are stored in radians. The degree variants exist because the
//! tuning surface (turn rate, articulation limit) is authored in degrees.
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f32::clamp`] this never panics: when `min > max` the result is
/// `min`, matching how the tuning layer treats a collapsed range.
///
/// # Examples
/// ```
/// use haulage::math::clamp;
/// assert_eq!(clamp(5.0, 0.0, 3.0), 3.0);
/// assert_eq!(clamp(-1.0, 0.0, 3.0), 0.0);
/// ```
#[must_use]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

/// Linear interpolation between `start` and `end`.
///
/// # Examples
/// ```
/// use haulage::math::lerp;
/// assert!((lerp(10.0, 20.0, 0.25) - 12.5).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    (end - start).mul_add(t, start)
}

/// Angle in radians of the ray from `from` to `to`.
#[must_use]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Wraps an angle in degrees into `(-180, 180]`.
///
/// # Examples
/// ```
/// use haulage::math::normalize_angle_deg;
/// assert!((normalize_angle_deg(190.0) + 170.0).abs() < 1e-4);
/// assert!((normalize_angle_deg(-180.0) - 180.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn normalize_angle_deg(angle: f32) -> f32 {
    180.0 - (180.0 - angle).rem_euclid(360.0)
}

/// Wraps an angle in radians into `(-π, π]`.
#[must_use]
pub fn normalize_angle_rad(angle: f32) -> f32 {
    PI - (PI - angle).rem_euclid(TAU)
}

/// Shortest signed rotation in degrees that turns `from` into `to`.
#[must_use]
pub fn angle_difference_deg(from: f32, to: f32) -> f32 {
    normalize_angle_deg(to - from)
}

/// Shortest signed rotation in radians that turns `from` into `to`.
#[must_use]
pub fn angle_difference_rad(from: f32, to: f32) -> f32 {
    normalize_angle_rad(to - from)
}

/// Interpolates between two headings along the shorter arc.
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    angle_difference_rad(from, to).mul_add(t, from)
}

/// Degrees to radians.
#[must_use]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Radians to degrees.
#[must_use]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Unit vector pointing along `rotation` (radians, x-right, y-down screen space).
#[must_use]
pub fn heading(rotation: f32) -> Vec2 {
    Vec2::from_angle(rotation)
}

/// Returns the unit vector of `vector`, or zero for zero-length and
/// non-finite input.
#[must_use]
pub fn direction_or_zero(vector: Vec2) -> Vec2 {
    if !vector.is_finite() {
        return Vec2::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec2::ZERO)
}
