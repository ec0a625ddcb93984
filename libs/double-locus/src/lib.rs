//! # Double Locus
//!
//! Reconstructs the self-intersection curve of a surface from an unordered
//! soup of line segments, frames it for tube rendering, and measures how
//! far each mesh face lies from it.
//!
//! ## Architecture
//!
//! ```text
//! segments (+ symmetry order)
//!   → locus::Pairing      spatial hash, junction buckets
//!   → loops::LoopBuilder  chain walking
//!   → frame::frame_loop   parallel transport + holonomy correction
//!   → LocusReport
//!
//! FaceMesh + seed faces → DistanceField (face or ribbon adjacency)
//! ```
//!
//! Recoverable oddities in the input (unmatched endpoints, exhausted
//! junctions, malformed locus lines) are collected as [`Diagnostics`] and
//! mirrored to the `log` facade. Only caller-contract violations are
//! returned as [`LocusError`].
//!
//! ## Usage
//!
//! ```rust
//! use double_locus::{reconstruct, LocusConfig};
//! use glam::DVec3;
//!
//! let square = [
//!     DVec3::new(0.0, 0.0, 0.0), DVec3::new(1.0, 0.0, 0.0),
//!     DVec3::new(1.0, 0.0, 0.0), DVec3::new(1.0, 1.0, 0.0),
//!     DVec3::new(1.0, 1.0, 0.0), DVec3::new(0.0, 1.0, 0.0),
//!     DVec3::new(0.0, 1.0, 0.0), DVec3::new(0.0, 0.0, 0.0),
//! ];
//! let report = reconstruct(&square, &LocusConfig::default())?;
//! assert_eq!(report.loops.len(), 1);
//! assert_eq!(report.loops[0].frames.len(), 4);
//! # Ok::<(), double_locus::LocusError>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod distance;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod locus;
pub mod locus_file;
pub mod loops;
pub mod mesh;
pub mod pipeline;

pub use crate::config::LocusConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use distance::{DistanceField, PropagationMode};
pub use error::LocusError;
pub use frame::{Frame, FramedLoop};
pub use locus_file::LocusFile;
pub use loops::Loop;
pub use mesh::FaceMesh;
pub use pipeline::{analyze, reconstruct, reconstruct_batch, Analysis, LocusReport};
