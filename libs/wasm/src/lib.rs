//! WASM-facing entry points for the double-locus engine.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Native tests interact with the `_internal` helpers to
//! avoid depending on a JS host.
//!
//! ```
//! let square: [f32; 24] = [
//!     0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
//!     1.0, 0.0, 0.0, 1.0, 1.0, 0.0,
//!     1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
//!     0.0, 1.0, 0.0, 0.0, 0.0, 0.0,
//! ];
//! let loops = double_locus_wasm::reconstruct_loops_internal(&square, 1).unwrap();
//! assert_eq!(loops.loop_count(), 1);
//! ```

use config::constants::{LOCUS_MATCH_EPSILON, MAX_SYMMETRY_ORDER};
use double_locus::loops::write_link;
use double_locus::{
    reconstruct, Diagnostics, DistanceField, FaceMesh, LocusConfig, LocusError, PropagationMode,
};
use glam::DVec3;
use thiserror::Error;
use wasm_bindgen::prelude::*;

mod diagnostics;
mod loop_handle;

pub use diagnostics::{Diagnostic, DiagnosticList, Severity};
pub use loop_handle::LoopSetHandle;

/// Errors raised while decoding buffers handed over from JavaScript.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Engine rejected the input
    #[error(transparent)]
    Locus(#[from] LocusError),

    /// Flat buffer length is not a multiple of its stride
    #[error("Buffer '{name}' has length {len}, expected a multiple of {stride}")]
    BufferLength {
        name: &'static str,
        len: usize,
        stride: usize,
    },

    /// Face sizes do not add up to the index buffer
    #[error("Face sizes sum to {expected} indices, but {found} were given")]
    FaceIndexCount { expected: usize, found: usize },
}

impl From<BridgeError> for JsValue {
    fn from(err: BridgeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "double-locus-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Returns the default per-coordinate endpoint match tolerance.
///
/// # Examples
/// ```
/// assert!(double_locus_wasm::default_match_epsilon() > 0.0);
/// ```
#[wasm_bindgen]
pub fn default_match_epsilon() -> f64 {
    LOCUS_MATCH_EPSILON
}

/// Returns the largest accepted rotational symmetry order.
#[wasm_bindgen]
pub fn max_symmetry_order() -> u32 {
    MAX_SYMMETRY_ORDER
}

/// Reconstructs framed loops from a flat segment buffer.
///
/// `endpoints` holds `[x, y, z]` triples, two per segment. `symmetry` is
/// the rotational order about the `z` axis (1 = none).
///
/// # Errors
/// Returns a JavaScript error value containing a human-readable message
/// when the buffer or symmetry order is invalid.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const loops = reconstruct_loops(new Float32Array(segments), 8);
/// // console.log(loops.loop_count, loops.diagnostics().len());
/// ```
#[wasm_bindgen]
pub fn reconstruct_loops(endpoints: Vec<f32>, symmetry: u32) -> Result<LoopSetHandle, JsValue> {
    reconstruct_loops_internal(&endpoints, symmetry).map_err(JsValue::from)
}

/// Host-only helper behind [`reconstruct_loops`].
///
/// # Examples
/// ```
/// let segment: [f32; 6] = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
/// let loops = double_locus_wasm::reconstruct_loops_internal(&segment, 1).unwrap();
/// assert!(!loops.is_closed(0));
/// ```
pub fn reconstruct_loops_internal(
    endpoints: &[f32],
    symmetry: u32,
) -> Result<LoopSetHandle, BridgeError> {
    let points = points_from_flat("endpoints", endpoints)?;
    let config = LocusConfig::default().with_symmetry(symmetry);
    let report = reconstruct(&points, &config)?;
    Ok(LoopSetHandle::from_report(&report))
}

/// Reconstructs loops and returns them as LINK text.
///
/// # Errors
/// Returns a JavaScript error value when the buffer or symmetry order is
/// invalid.
#[wasm_bindgen]
pub fn loops_to_link(endpoints: Vec<f32>, symmetry: u32) -> Result<String, JsValue> {
    loops_to_link_internal(&endpoints, symmetry).map_err(JsValue::from)
}

/// Host-only helper behind [`loops_to_link`].
pub fn loops_to_link_internal(endpoints: &[f32], symmetry: u32) -> Result<String, BridgeError> {
    let points = points_from_flat("endpoints", endpoints)?;
    let config = LocusConfig::default().with_symmetry(symmetry);
    let report = reconstruct(&points, &config)?;

    let curves: Vec<_> = report.loops.into_iter().map(|l| l.curve).collect();
    let mut out = Vec::new();
    write_link(&mut out, &curves).map_err(LocusError::from)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Computes the per-face distance from the seed faces.
///
/// The mesh is passed as flat positions, a face-size list and the
/// concatenated face indices. Unreached faces read 255.
///
/// # Errors
/// Returns a JavaScript error value when the mesh buffers are inconsistent.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const dist = locus_distances(positions, sizes, indices, seeds, false);
/// // material.setAttribute("dist", new THREE.BufferAttribute(dist, 1));
/// ```
#[wasm_bindgen]
pub fn locus_distances(
    positions: Vec<f32>,
    face_sizes: Vec<u32>,
    face_indices: Vec<u32>,
    seeds: Vec<u32>,
    ribbon: bool,
) -> Result<Vec<u8>, JsValue> {
    locus_distances_internal(&positions, &face_sizes, &face_indices, &seeds, ribbon)
        .map(|(field, _)| field.into_vec())
        .map_err(JsValue::from)
}

/// Host-only helper behind [`locus_distances`]; also returns the
/// diagnostics raised while building the mesh and propagating.
pub fn locus_distances_internal(
    positions: &[f32],
    face_sizes: &[u32],
    face_indices: &[u32],
    seeds: &[u32],
    ribbon: bool,
) -> Result<(DistanceField, DiagnosticList), BridgeError> {
    let positions = points_from_flat("positions", positions)?;
    let faces = split_faces(face_sizes, face_indices)?;

    let mut diagnostics = Diagnostics::new();
    let mesh = FaceMesh::new(positions, faces, &mut diagnostics)?;
    let seeds: Vec<usize> = seeds.iter().map(|&s| s as usize).collect();
    let mode = if ribbon {
        PropagationMode::Ribbon
    } else {
        PropagationMode::Face
    };
    let field = DistanceField::compute(&mesh, &seeds, mode, &mut diagnostics);

    Ok((field, DiagnosticList::from(&diagnostics)))
}

fn points_from_flat(name: &'static str, flat: &[f32]) -> Result<Vec<DVec3>, BridgeError> {
    if flat.len() % 3 != 0 {
        return Err(BridgeError::BufferLength {
            name,
            len: flat.len(),
            stride: 3,
        });
    }
    Ok(flat
        .chunks_exact(3)
        .map(|c| DVec3::new(f64::from(c[0]), f64::from(c[1]), f64::from(c[2])))
        .collect())
}

fn split_faces(sizes: &[u32], indices: &[u32]) -> Result<Vec<Vec<u32>>, BridgeError> {
    let expected: usize = sizes.iter().map(|&s| s as usize).sum();
    if expected != indices.len() {
        return Err(BridgeError::FaceIndexCount {
            expected,
            found: indices.len(),
        });
    }

    let mut rest = indices;
    Ok(sizes
        .iter()
        .map(|&size| {
            let (face, tail) = rest.split_at(size as usize);
            rest = tail;
            face.to_vec()
        })
        .collect())
}
