use super::*;
use crate::loops::Loop;
use approx::assert_abs_diff_eq;
use glam::DVec3;
use std::f64::consts::{FRAC_1_SQRT_2, TAU};

fn make_loop(points: Vec<DVec3>, closed: bool) -> Loop {
    Loop {
        id: 0,
        points,
        closed,
    }
}

fn assert_orthonormal(frames: &[Frame]) {
    for (k, f) in frames.iter().enumerate() {
        assert!(f.x.is_finite() && f.y.is_finite(), "frame {k} not finite");
        assert_abs_diff_eq!(f.x.length(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.y.length(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(f.x.dot(f.y), 0.0, epsilon = 1e-9);
    }
}

fn warped_circle(n: usize) -> Vec<DVec3> {
    (0..n)
        .map(|k| {
            let t = TAU * k as f64 / n as f64;
            DVec3::new(t.cos(), t.sin(), 0.6 * (2.0 * t).sin() + 0.2 * t.cos())
        })
        .collect()
}

#[test]
fn test_square_frames_keep_one_side_up() {
    let points = vec![
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(0.0, 0.0, 0.0),
    ];
    let framed = frame_loop(make_loop(points, true));

    assert_eq!(framed.frames.len(), 4);
    assert_orthonormal(&framed.frames);
    let side = framed.frames[0].y.z.signum();
    for f in &framed.frames {
        assert_eq!(f.y.z.signum(), side);
        assert_abs_diff_eq!(f.y.z.abs(), FRAC_1_SQRT_2, epsilon = 1e-9);
    }
    assert_abs_diff_eq!(framed.holonomy, 0.0, epsilon = 1e-9);
}

#[test]
fn test_closed_loop_frame_returns_to_start() {
    let points = warped_circle(24);
    let framed = frame_loop(make_loop(points.clone(), true));
    assert_orthonormal(&framed.frames);

    let first = framed.frames[0];
    let last = framed.frames[points.len() - 1];
    let carry = geodesic_rotation(last.tangent(), first.tangent());
    let carried_x = carry * last.x;
    let carried_y = carry * last.y;
    let residual = first.x.dot(carried_y).atan2(first.x.dot(carried_x));

    let closing = points[points.len() - 1].distance(points[0]);
    let perimeter = framed.curve.length();
    assert_abs_diff_eq!(residual, framed.holonomy * closing / perimeter, epsilon = 1e-9);
}

#[test]
fn test_tangent_follows_straight_line() {
    let dir = DVec3::new(1.0, 2.0, 2.0) / 3.0;
    let points = (0..5).map(|k| dir * k as f64).collect();
    let framed = frame_loop(make_loop(points, false));

    assert_orthonormal(&framed.frames);
    for f in &framed.frames {
        let t = f.tangent();
        assert_abs_diff_eq!(t.dot(dir), 1.0, epsilon = 1e-9);
    }
    assert_eq!(framed.holonomy, 0.0);
}

#[test]
fn test_hairpin_stays_orthonormal() {
    let points = vec![
        DVec3::ZERO,
        DVec3::X,
        DVec3::ZERO,
        DVec3::new(0.0, 0.0, 1.0),
    ];
    let framed = frame_loop(make_loop(points, false));
    assert_orthonormal(&framed.frames);
}

#[test]
fn test_repeated_points_produce_no_nan() {
    let points = vec![DVec3::ONE, DVec3::ONE, DVec3::ONE];
    let framed = frame_loop(make_loop(points, true));
    assert_orthonormal(&framed.frames);
    assert_eq!(framed.holonomy, 0.0);
}

#[test]
fn test_empty_loop_has_no_frames() {
    let framed = frame_loop(make_loop(Vec::new(), true));
    assert!(framed.frames.is_empty());
    assert!(framed.is_closed());
}

#[test]
fn test_twist_preserves_tangent() {
    let frame = Frame {
        x: DVec3::X,
        y: DVec3::Y,
    };
    let turned = frame.twisted(0.3);
    assert_abs_diff_eq!((turned.tangent() - DVec3::Z).length(), 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(turned.x.dot(DVec3::X), 0.3_f64.cos(), epsilon = 1e-12);
}
