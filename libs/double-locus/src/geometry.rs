//! # Vector Helpers
//!
//! Small `DVec3` utilities shared by matching and framing. All of them
//! return zero vectors for degenerate input rather than `NaN`.

use config::constants::ZERO_LENGTH_EPSILON;
use glam::DVec3;

/// Returns true if every coordinate of `a` and `b` differs by less than
/// `epsilon`.
///
/// # Example
///
/// ```rust
/// use double_locus::geometry::points_match;
/// use glam::DVec3;
///
/// assert!(points_match(DVec3::ONE, DVec3::new(1.0, 1.0, 1.00001), 2e-5));
/// assert!(!points_match(DVec3::ONE, DVec3::ZERO, 2e-5));
/// ```
#[inline]
pub fn points_match(a: DVec3, b: DVec3, epsilon: f64) -> bool {
    let d = (a - b).abs();
    d.x < epsilon && d.y < epsilon && d.z < epsilon
}

/// Normalizes `v`, returning the unit vector and the original length.
///
/// Vectors shorter than `ZERO_LENGTH_EPSILON` yield `(DVec3::ZERO, len)`.
#[inline]
pub fn unit_and_length(v: DVec3) -> (DVec3, f64) {
    let len = v.length();
    if len > ZERO_LENGTH_EPSILON {
        (v / len, len)
    } else {
        (DVec3::ZERO, len)
    }
}

/// Normalizes `v`, or returns zero for a degenerate vector.
#[inline]
pub fn unit_or_zero(v: DVec3) -> DVec3 {
    unit_and_length(v).0
}

/// Component of `v` perpendicular to `onto`.
///
/// Returns `v` unchanged when `onto` has zero length.
#[inline]
pub fn reject(v: DVec3, onto: DVec3) -> DVec3 {
    let mag2 = onto.length_squared();
    if mag2 > 0.0 {
        v - onto * (v.dot(onto) / mag2)
    } else {
        v
    }
}

/// Rotates `p` about the vertical `z` axis by the angle whose cosine and
/// sine are given.
#[inline]
pub fn rotate_about_z(p: DVec3, cos: f64, sin: f64) -> DVec3 {
    DVec3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z)
}
