//! # Tube Framing
//!
//! Parallel-transports a cross-section frame along a loop.
//!
//! At each vertex the running tangent is the sum of the unit chords
//! arriving and leaving. The previous frame is carried onto the new tangent
//! by [`geodesic_rotation`] and re-orthonormalized against it, so the
//! frame twists as little as the curve allows.
//!
//! A closed loop generally does not bring the frame back to its start.
//! That residual rotation (the holonomy) is spread over the loop in
//! proportion to arc length.

use config::constants::DEGENERATE_TANGENT_SQ;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::rotation::geodesic_rotation;
use crate::geometry::{reject, unit_and_length, unit_or_zero};
use crate::loops::Loop;

/// Orthonormal cross-section axes at one loop vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: DVec3,
    pub y: DVec3,
}

impl Frame {
    /// Unit tangent implied by the frame.
    #[inline]
    pub fn tangent(&self) -> DVec3 {
        self.x.cross(self.y)
    }

    /// Turns the frame by `angle` inside its own plane, `x` toward `y`.
    #[inline]
    pub fn twisted(&self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos + self.y * sin,
            y: self.y * cos - self.x * sin,
        }
    }
}

/// A loop with one frame per vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramedLoop {
    pub curve: Loop,
    pub frames: Vec<Frame>,
    /// Twist spread over a closed loop to close the frame; zero for open
    /// loops.
    pub holonomy: f64,
}

impl FramedLoop {
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.curve.closed
    }

    pub fn points(&self) -> &[DVec3] {
        &self.curve.points
    }
}

/// Frames every vertex of `curve`.
///
/// Frames start from the global `x`/`y` axes with a virtual `z` tangent.
///
/// # Example
///
/// ```rust
/// use double_locus::frame::frame_loop;
/// use double_locus::loops::Loop;
/// use glam::DVec3;
///
/// let l = Loop { id: 0, points: vec![DVec3::ZERO, DVec3::Z, DVec3::Z * 2.0], closed: false };
/// let framed = frame_loop(l);
/// assert_eq!(framed.frames.len(), 3);
/// assert!((framed.frames[0].x - DVec3::X).length() < 1e-12);
/// ```
pub fn frame_loop(curve: Loop) -> FramedLoop {
    let points = &curve.points;
    let n = points.len();
    if n == 0 {
        return FramedLoop {
            curve,
            frames: Vec::new(),
            holonomy: 0.0,
        };
    }

    let mut x = DVec3::X;
    let mut tangent = DVec3::Z;
    let mut first_tangent = DVec3::Z;
    let mut frames = Vec::with_capacity(n);
    let mut perimeter = 0.0;

    let mut next_chord = if curve.closed {
        unit_or_zero(points[0] - points[n - 1])
    } else {
        DVec3::ZERO
    };

    for i in 0..n {
        let prev_tangent = tangent;
        let prev_chord = next_chord;

        if i + 1 < n {
            let (chord, length) = unit_and_length(points[i + 1] - points[i]);
            next_chord = chord;
            perimeter += length;
        } else if curve.closed {
            let (chord, length) = unit_and_length(points[0] - points[i]);
            next_chord = chord;
            perimeter += length;
        }

        tangent = running_tangent(prev_chord, next_chord).unwrap_or(prev_tangent);

        let rotation = geodesic_rotation(prev_tangent, tangent);
        x = rotation * x;

        x = unit_or_zero(reject(x, tangent));
        if x == DVec3::ZERO {
            x = tangent.any_orthonormal_vector();
        }
        let y = unit_or_zero(tangent.cross(x));

        frames.push(Frame { x, y });
        if i == 0 {
            first_tangent = tangent;
        }
    }

    let holonomy = if curve.closed && perimeter > 0.0 {
        correct_holonomy(points, &mut frames, tangent, first_tangent, perimeter)
    } else {
        0.0
    };

    FramedLoop {
        curve,
        frames,
        holonomy,
    }
}

/// Unit tangent from the chords meeting at a vertex: their sum, else
/// their difference, else the incoming chord. `None` if all vanish.
fn running_tangent(prev_chord: DVec3, next_chord: DVec3) -> Option<DVec3> {
    let mut tangent = prev_chord + next_chord;
    if tangent.length_squared() < DEGENERATE_TANGENT_SQ {
        tangent = prev_chord - next_chord;
        if tangent.length_squared() < DEGENERATE_TANGENT_SQ {
            tangent = prev_chord;
        }
    }
    let unit = unit_or_zero(tangent);
    (unit != DVec3::ZERO).then_some(unit)
}

/// Carries the last frame across the closing chord, measures how far it
/// landed from the first frame, and twists every later frame by its share
/// of that angle. Returns the angle.
fn correct_holonomy(
    points: &[DVec3],
    frames: &mut [Frame],
    last_tangent: DVec3,
    first_tangent: DVec3,
    perimeter: f64,
) -> f64 {
    let (Some(first), Some(last)) = (frames.first().copied(), frames.last().copied()) else {
        return 0.0;
    };
    let closing = geodesic_rotation(last_tangent, first_tangent);
    let carried_x = closing * last.x;
    let carried_y = closing * last.y;
    let turn = first.x.dot(carried_y).atan2(first.x.dot(carried_x));

    let mut arc = 0.0;
    for i in 1..frames.len() {
        arc += points[i - 1].distance(points[i]);
        frames[i] = frames[i].twisted(turn * arc / perimeter);
    }
    turn
}
