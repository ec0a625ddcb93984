//! # Loop Handle
//!
//! WASM-friendly wrapper for framed loops that can be transferred to
//! JavaScript.

use double_locus::{FramedLoop, LocusReport};
use wasm_bindgen::prelude::*;

use crate::diagnostics::DiagnosticList;

/// Flattened buffers for one framed loop.
#[derive(Debug, Clone)]
struct LoopBuffers {
    /// Positions as [x, y, z, x, y, z, ...]
    vertices: Vec<f32>,
    /// Frames as [xx, xy, xz, yx, yy, yz, ...], one pair per vertex
    frames: Vec<f32>,
    closed: bool,
    holonomy: f64,
}

impl From<&FramedLoop> for LoopBuffers {
    fn from(framed: &FramedLoop) -> Self {
        let vertices = framed
            .points()
            .iter()
            .flat_map(|p| p.to_array())
            .map(|c| c as f32)
            .collect();
        let frames = framed
            .frames
            .iter()
            .flat_map(|f| f.x.to_array().into_iter().chain(f.y.to_array()))
            .map(|c| c as f32)
            .collect();

        Self {
            vertices,
            frames,
            closed: framed.is_closed(),
            holonomy: framed.holonomy,
        }
    }
}

/// A handle to reconstructed loops that can be accessed from JavaScript.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const loops = reconstruct_loops(endpoints, 8);
///
/// for (let i = 0; i < loops.loop_count; i++) {
///   const points = loops.vertices(i);  // Float32Array, 3 per vertex
///   const frames = loops.frames(i);    // Float32Array, 6 per vertex
///   const curve = new THREE.CatmullRomCurve3(toVectors(points), loops.is_closed(i));
/// }
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct LoopSetHandle {
    loops: Vec<LoopBuffers>,
    diagnostics: DiagnosticList,
    diagnostics_json: String,
}

#[wasm_bindgen]
impl LoopSetHandle {
    /// Returns the number of loops.
    #[wasm_bindgen(getter)]
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    /// Returns the total number of vertices over all loops.
    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.loops.iter().map(|l| l.vertices.len() / 3).sum()
    }

    /// Returns the positions of loop `index` as a Float32Array.
    ///
    /// Format: [x, y, z, x, y, z, ...]
    /// Empty for an out-of-range index.
    pub fn vertices(&self, index: usize) -> Vec<f32> {
        self.loops
            .get(index)
            .map(|l| l.vertices.clone())
            .unwrap_or_default()
    }

    /// Returns the frames of loop `index` as a Float32Array.
    ///
    /// Format: [xx, xy, xz, yx, yy, yz, ...]
    /// Length: vertex count * 6
    pub fn frames(&self, index: usize) -> Vec<f32> {
        self.loops
            .get(index)
            .map(|l| l.frames.clone())
            .unwrap_or_default()
    }

    /// Returns true if loop `index` is closed.
    pub fn is_closed(&self, index: usize) -> bool {
        self.loops.get(index).is_some_and(|l| l.closed)
    }

    /// Returns the twist spread around loop `index` to close its frames.
    pub fn holonomy(&self, index: usize) -> f64 {
        self.loops.get(index).map_or(0.0, |l| l.holonomy)
    }

    /// Returns the diagnostics collected during reconstruction.
    pub fn diagnostics(&self) -> DiagnosticList {
        self.diagnostics.clone()
    }

    /// Returns the diagnostics as a JSON array, with structured fields
    /// for each kind.
    pub fn diagnostics_json(&self) -> String {
        self.diagnostics_json.clone()
    }

    /// Returns true if no loops were reconstructed.
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

impl LoopSetHandle {
    /// Creates a LoopSetHandle from a reconstruction report.
    pub fn from_report(report: &LocusReport) -> Self {
        Self {
            loops: report.loops.iter().map(LoopBuffers::from).collect(),
            diagnostics: DiagnosticList::from(&report.diagnostics),
            diagnostics_json: serde_json::to_string(&report.diagnostics)
                .unwrap_or_else(|_| "[]".to_owned()),
        }
    }
}
