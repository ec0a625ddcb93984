//! # Reconstruction Pipeline
//!
//! ```text
//! endpoints → Pairing → LoopBuilder → frame_loop → LocusReport
//! mesh + seeds → DistanceField
//! ```

use glam::DVec3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::LocusConfig;
use crate::diagnostics::Diagnostics;
use crate::distance::{DistanceField, PropagationMode};
use crate::error::LocusError;
use crate::frame::{frame_loop, FramedLoop};
use crate::locus::Pairing;
use crate::locus_file::LocusFile;
use crate::loops::LoopBuilder;
use crate::mesh::FaceMesh;

/// Framed loops and everything noticed while building them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocusReport {
    pub loops: Vec<FramedLoop>,
    pub diagnostics: Diagnostics,
}

impl LocusReport {
    pub fn closed_count(&self) -> usize {
        self.loops.iter().filter(|l| l.is_closed()).count()
    }

    /// Total vertices over all loops.
    pub fn vertex_count(&self) -> usize {
        self.loops.iter().map(|l| l.points().len()).sum()
    }
}

/// Reconstructs framed loops from a segment soup (two endpoints per
/// segment).
///
/// # Errors
///
/// Returns an error for an invalid configuration or an oversized soup.
///
/// # Example
///
/// ```rust
/// use double_locus::{reconstruct, LocusConfig};
/// use glam::DVec3;
///
/// let (a, b, c) = (DVec3::ZERO, DVec3::X, DVec3::Y);
/// let report = reconstruct(&[a, b, b, c, c, a], &LocusConfig::default())?;
/// assert_eq!(report.loops.len(), 1);
/// assert_eq!(report.closed_count(), 1);
/// # Ok::<(), double_locus::LocusError>(())
/// ```
pub fn reconstruct(endpoints: &[DVec3], config: &LocusConfig) -> Result<LocusReport, LocusError> {
    let mut diagnostics = Diagnostics::new();
    let pairing = Pairing::build(endpoints, config, &mut diagnostics)?;
    let loops = LoopBuilder::new(&pairing, config)
        .build(&mut diagnostics)
        .into_iter()
        .map(frame_loop)
        .collect();

    Ok(LocusReport { loops, diagnostics })
}

/// Reconstructs several independent soups in parallel.
///
/// Results come back in input order.
pub fn reconstruct_batch<S>(soups: &[S], config: &LocusConfig) -> Vec<Result<LocusReport, LocusError>>
where
    S: AsRef<[DVec3]> + Sync,
{
    soups
        .par_iter()
        .map(|soup| reconstruct(soup.as_ref(), config))
        .collect()
}

/// Distance field and framed loops for one mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub distances: DistanceField,
    pub report: LocusReport,
}

/// Seeds the distance field from the locus file's faces and reconstructs
/// loops from its endpoints. Diagnostics from both land in the report.
pub fn analyze(
    mesh: &FaceMesh,
    locus: &LocusFile,
    mode: PropagationMode,
    config: &LocusConfig,
) -> Result<Analysis, LocusError> {
    let mut report = reconstruct(&locus.endpoints, config)?;
    let distances = DistanceField::compute(mesh, &locus.seeds, mode, &mut report.diagnostics);
    Ok(Analysis { distances, report })
}
