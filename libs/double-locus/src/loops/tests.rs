use super::*;
use crate::config::LocusConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::locus::{EndpointId, Link, Pairing};
use approx::assert_relative_eq;
use std::f64::consts::FRAC_PI_6;

fn extract(points: &[DVec3], config: &LocusConfig) -> (Vec<Loop>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let pairing = Pairing::build(points, config, &mut diagnostics).expect("pairing");
    let loops = LoopBuilder::new(&pairing, config).build(&mut diagnostics);
    (loops, diagnostics)
}

fn p(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x, y, z)
}

#[test]
fn test_square_forms_one_closed_loop() {
    let a = p(0.0, 0.0, 0.0);
    let b = p(1.0, 0.0, 0.0);
    let c = p(1.0, 1.0, 0.0);
    let d = p(0.0, 1.0, 0.0);
    let (loops, diagnostics) = extract(&[a, b, b, c, c, d, d, a], &LocusConfig::default());

    assert_eq!(loops.len(), 1);
    assert!(loops[0].closed);
    assert_eq!(loops[0].points, vec![b, c, d, a]);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_reversed_duplicate_is_discarded() {
    let o = p(0.0, 0.0, 0.0);
    let x = p(1.0, 0.0, 0.0);
    let mut diagnostics = Diagnostics::new();
    let config = LocusConfig::default();
    let pairing = Pairing::build(&[o, x, x, o], &config, &mut diagnostics).expect("pairing");

    assert_eq!(pairing.link(EndpointId::new(0)), Link::Endpoint(EndpointId::new(3)));
    assert_eq!(pairing.link(EndpointId::new(1)), Link::Endpoint(EndpointId::new(2)));

    let loops = LoopBuilder::new(&pairing, &config).build(&mut diagnostics);
    assert!(loops.is_empty());
    assert!(diagnostics.any(|k| matches!(k, DiagnosticKind::DegenerateCycle { .. })));
}

#[test]
fn test_junction_walk_takes_straightest_branch() {
    let a = p(-1.0, 0.0, 0.0);
    let o = p(0.0, 0.0, 0.0);
    let b = p(1.0, 0.0, 0.0);
    let c = p(0.0, 1.0, 0.0);
    let (loops, diagnostics) = extract(&[a, o, o, b, o, c], &LocusConfig::default());

    assert_eq!(loops.len(), 2);
    assert_eq!(loops[0].points, vec![a, o, b]);
    assert!(!loops[0].closed);
    assert_eq!(loops[1].points, vec![o, c]);

    assert!(diagnostics.any(|k| matches!(
        k,
        DiagnosticKind::JunctionExhausted { fold: 3, endpoint: 4, token: -3, .. }
    )));
}

#[test]
fn test_open_chain_keeps_both_ends() {
    let a = p(0.0, 0.0, 0.0);
    let b = p(1.0, 0.0, 0.0);
    let c = p(1.0, 1.0, 0.0);
    let (loops, _) = extract(&[a, b, b, c], &LocusConfig::default());

    assert_eq!(loops.len(), 1);
    assert!(!loops[0].closed);
    assert_eq!(loops[0].points, vec![a, b, c]);
}

#[test]
fn test_isolated_segment_becomes_open_loop() {
    let (loops, diagnostics) = extract(&[p(0.0, 0.0, 0.0), p(0.0, 0.0, 1.0)], &LocusConfig::default());
    assert_eq!(loops.len(), 1);
    assert!(!loops[0].closed);
    assert_eq!(loops[0].len(), 2);
    assert!(diagnostics.any(|k| matches!(k, DiagnosticKind::UnmatchedEndpoint { .. })));
}

#[test]
fn test_tiny_segments_collapse() {
    let a = p(0.0, 0.0, 0.0);
    let b = p(1.0, 0.0, 0.0);
    let b2 = p(1.01, 0.0, 0.0);
    let c = p(2.0, 0.0, 0.0);
    let (loops, _) = extract(&[a, b, b, b2, b2, c], &LocusConfig::default());

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].points, vec![a, b, c]);
}

#[test]
fn test_self_image_never_joins_loops() {
    let config = LocusConfig::default().with_symmetry(2);
    let (loops, _) = extract(&[p(1.0, 0.0, 0.0), p(-1.0, 0.0, 0.0)], &config);

    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].points, vec![p(1.0, 0.0, 0.0), p(-1.0, 0.0, 0.0)]);
}

#[test]
fn test_symmetry_closes_quarter_arc() {
    let points: Vec<DVec3> = (0..3)
        .flat_map(|k| {
            let a0 = FRAC_PI_6 * k as f64;
            let a1 = FRAC_PI_6 * (k + 1) as f64;
            [
                p(4.0 * a0.cos(), 4.0 * a0.sin(), 0.0),
                p(4.0 * a1.cos(), 4.0 * a1.sin(), 0.0),
            ]
        })
        .collect();
    let config = LocusConfig::default().with_symmetry(4);
    let (loops, _) = extract(&points, &config);

    assert_eq!(loops.len(), 1);
    assert!(loops[0].closed);
    assert_eq!(loops[0].len(), 12);
    assert_relative_eq!(loops[0].length(), 12.0 * 8.0 * (FRAC_PI_6 / 2.0).sin(), epsilon = 1e-9);
}

#[test]
fn test_build_is_idempotent() {
    let a = p(-1.0, 0.0, 0.0);
    let o = p(0.0, 0.0, 0.0);
    let b = p(1.0, 0.0, 0.0);
    let c = p(0.0, 1.0, 0.0);
    let config = LocusConfig::default();
    let mut diagnostics = Diagnostics::new();
    let pairing = Pairing::build(&[a, o, o, b, o, c], &config, &mut diagnostics).expect("pairing");
    let builder = LoopBuilder::new(&pairing, &config);

    let mut first_diags = Diagnostics::new();
    let mut second_diags = Diagnostics::new();
    let first = builder.build(&mut first_diags);
    let second = builder.build(&mut second_diags);

    assert_eq!(first, second);
    assert_eq!(first_diags, second_diags);
    assert!(pairing.is_consistent());
}

#[test]
fn test_loop_measures() {
    let square = Loop {
        id: 0,
        points: vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)],
        closed: true,
    };
    assert_eq!(square.segment_count(), 4);
    assert_relative_eq!(square.length(), 4.0);

    let open = Loop {
        closed: false,
        ..square.clone()
    };
    assert_eq!(open.segment_count(), 3);
    assert_relative_eq!(open.length(), 3.0);
}

#[test]
fn test_write_link_lists_counts_then_vertices() {
    let loops = vec![
        Loop {
            id: 0,
            points: vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)],
            closed: true,
        },
        Loop {
            id: 1,
            points: vec![p(0.5, 0.0, 2.0), p(0.0, 0.0, 3.0)],
            closed: false,
        },
    ];
    let mut out = Vec::new();
    write_link(&mut out, &loops).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(&lines[..4], &["LINK", "2", "3", "2"]);
    assert_eq!(lines[4], "");
    assert_eq!(lines[5], "0 0 0");
    assert_eq!(lines[8], "");
    assert_eq!(lines[9], "0.5 0 2");
}
