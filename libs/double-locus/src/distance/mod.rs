//! # Distance From the Double Locus
//!
//! Breadth-first propagation of a per-face hop count from the faces the
//! locus runs through.
//!
//! ## Modes
//!
//! - **Face**: a face's neighbours are the faces across its edges.
//! - **Ribbon**: a face's neighbours are all faces fanned around each of
//!   its vertices, reached by walking edge-adjacent faces that keep the
//!   vertex. This widens the band around the locus to whole vertex stars.
//!
//! Distances saturate at 254; 255 marks faces the search never reached.

use std::collections::VecDeque;

use config::constants::{
    clamp_distance, DISTANCE_SEED, DISTANCE_UNKNOWN, STACKER_RED_ZONE_BYTES,
    STACKER_STACK_SIZE_BYTES,
};
use serde::{Deserialize, Serialize};
use stacker::maybe_grow;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::mesh::FaceMesh;

/// Which faces count as neighbours during propagation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropagationMode {
    /// Faces sharing an edge.
    #[default]
    Face,
    /// Faces sharing a vertex, found by walking around it.
    Ribbon,
}

/// One distance byte per face.
///
/// # Example
///
/// ```rust
/// use double_locus::{Diagnostics, DistanceField, FaceMesh, PropagationMode};
/// use glam::DVec3;
///
/// let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::ONE];
/// let mesh = FaceMesh::new(positions, vec![vec![0, 1, 2], vec![2, 1, 3]], &mut Diagnostics::new())?;
/// let field = DistanceField::compute(&mesh, &[1], PropagationMode::Face, &mut Diagnostics::new());
/// assert_eq!(field.as_slice(), &[1, 0]);
/// # Ok::<(), double_locus::LocusError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceField(Vec<u8>);

impl DistanceField {
    /// Propagates distances from `seeds` over `mesh`.
    ///
    /// Seeds beyond the face count are reported and ignored.
    pub fn compute(
        mesh: &FaceMesh,
        seeds: &[usize],
        mode: PropagationMode,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let face_count = mesh.face_count();
        let mut distances = vec![DISTANCE_UNKNOWN; face_count];
        for &face in seeds {
            match distances.get_mut(face) {
                Some(d) => *d = DISTANCE_SEED,
                None => diagnostics.warn(DiagnosticKind::SeedOutOfRange { face, face_count }),
            }
        }

        let queue = distances
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d == DISTANCE_SEED)
            .map(|(f, _)| f)
            .collect();

        let mut propagation = Propagation {
            mesh,
            distances,
            queue,
            stamps: vec![0; face_count],
            search: 0,
        };
        propagation.run(mode);

        let field = Self(propagation.distances);
        log::debug!(
            "distance field over {} faces ({:?} mode): {} reached",
            face_count,
            mode,
            field.reached()
        );
        field
    }

    #[inline]
    pub fn get(&self, face: usize) -> u8 {
        self.0[face]
    }

    #[inline]
    pub fn is_known(&self, face: usize) -> bool {
        self.0[face] != DISTANCE_UNKNOWN
    }

    /// Number of faces with a known distance.
    pub fn reached(&self) -> usize {
        self.0.iter().filter(|&&d| d != DISTANCE_UNKNOWN).count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

/// Working state of one propagation.
struct Propagation<'a> {
    mesh: &'a FaceMesh,
    distances: Vec<u8>,
    queue: VecDeque<usize>,
    /// Id of the last ribbon search that entered each face.
    stamps: Vec<usize>,
    search: usize,
}

impl Propagation<'_> {
    fn run(&mut self, mode: PropagationMode) {
        let mesh = self.mesh;
        while let Some(f) = self.queue.pop_front() {
            let thresh = clamp_distance(u32::from(self.distances[f]) + 1);
            match mode {
                PropagationMode::Face => {
                    for &adj in mesh.adjacent(f).iter().rev().flatten() {
                        self.lower(adj, thresh);
                    }
                }
                PropagationMode::Ribbon => {
                    for &v in mesh.face(f).iter().rev() {
                        self.search += 1;
                        self.search_fan(f, f, f, v, thresh);
                    }
                }
            }
        }
    }

    /// Sets `face` to `thresh` and queues it if that is an improvement.
    #[inline]
    fn lower(&mut self, face: usize, thresh: u8) {
        if self.distances[face] > thresh {
            self.distances[face] = thresh;
            self.queue.push_back(face);
        }
    }

    /// Walks from `face` through edge-adjacent faces containing `v`,
    /// never stepping back into `origin` or `previous`. Faces already
    /// closer than `thresh` end the branch.
    fn search_fan(&mut self, origin: usize, previous: usize, face: usize, v: u32, thresh: u8) {
        let mesh = self.mesh;
        for &adj in mesh.adjacent(face).iter().rev().flatten() {
            if adj == origin
                || adj == previous
                || self.stamps[adj] == self.search
                || !mesh.face_has_vertex(adj, v)
                || self.distances[adj] < thresh
            {
                continue;
            }
            self.stamps[adj] = self.search;
            self.lower(adj, thresh);
            maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
                self.search_fan(origin, face, adj, v, thresh)
            });
        }
    }
}
