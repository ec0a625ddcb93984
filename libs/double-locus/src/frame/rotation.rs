//! Minimal rotation between two directions.

use config::constants::OPPOSITE_AXIS_THRESHOLD;
use glam::{DMat3, DVec3};

use crate::geometry::{reject, unit_or_zero};

/// `u vᵀ` as a column-major matrix.
#[inline]
fn outer(u: DVec3, v: DVec3) -> DMat3 {
    DMat3::from_cols(u * v.x, u * v.y, u * v.z)
}

/// Rotation taking the direction of `from` onto the direction of `to`
/// about the axis `from × to`.
///
/// Returns the identity when either vector is zero or both point the same
/// way. Exactly opposite vectors are turned 180° in a plane containing
/// them, built from the `x` axis (or the `y` axis when `from` is mostly
/// along `x`).
///
/// # Example
///
/// ```rust
/// use double_locus::frame::geodesic_rotation;
/// use glam::DVec3;
///
/// let r = geodesic_rotation(DVec3::Z, DVec3::X);
/// assert!((r * DVec3::Z - DVec3::X).length() < 1e-12);
/// assert!((r * DVec3::Y - DVec3::Y).length() < 1e-12);
/// ```
pub fn geodesic_rotation(from: DVec3, to: DVec3) -> DMat3 {
    let a = unit_or_zero(from);
    let b = unit_or_zero(to);
    if a == DVec3::ZERO || b == DVec3::ZERO {
        return DMat3::IDENTITY;
    }

    let cos = a.dot(b);
    let mut perp = unit_or_zero(reject(b, a));
    if perp == DVec3::ZERO {
        if cos >= 0.0 {
            return DMat3::IDENTITY;
        }
        let seed = if a.x.abs() < OPPOSITE_AXIS_THRESHOLD {
            DVec3::X
        } else {
            DVec3::Y
        };
        perp = unit_or_zero(reject(seed, a));
    }
    let sin = perp.dot(b);

    DMat3::IDENTITY
        + (outer(a, a) + outer(perp, perp)) * (cos - 1.0)
        + (outer(perp, a) - outer(a, perp)) * sin
}
