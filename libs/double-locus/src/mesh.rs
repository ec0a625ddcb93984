//! # Face Mesh
//!
//! Polygon mesh with per-edge face adjacency, the input to distance
//! propagation.
//!
//! Edge `i` of a face runs from its vertex `i` to vertex `i + 1` (wrapping),
//! and `adjacent(f)[i]` names the face across that edge.

use std::collections::HashMap;

use glam::DVec3;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LocusError;

/// Polygon mesh with face adjacency.
///
/// # Example
///
/// ```rust
/// use double_locus::{Diagnostics, FaceMesh};
/// use glam::DVec3;
///
/// let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)];
/// let faces = vec![vec![0, 1, 2], vec![2, 1, 3]];
/// let mesh = FaceMesh::new(positions, faces, &mut Diagnostics::new())?;
/// assert_eq!(mesh.adjacent(0)[1], Some(1));
/// assert_eq!(mesh.adjacent(0)[0], None);
/// # Ok::<(), double_locus::LocusError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FaceMesh {
    positions: Vec<DVec3>,
    faces: Vec<Vec<u32>>,
    adjacency: Vec<Vec<Option<usize>>>,
}

impl FaceMesh {
    /// Builds a mesh, deriving adjacency from shared undirected edges.
    ///
    /// Edges shared by more than two faces are reported and linked to the
    /// first other face found on them.
    pub fn new(
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, LocusError> {
        validate_faces(&faces, positions.len())?;
        let adjacency = derive_adjacency(&faces, diagnostics);
        Ok(Self {
            positions,
            faces,
            adjacency,
        })
    }

    /// Builds a mesh from a caller-supplied adjacency table.
    pub fn with_adjacency(
        positions: Vec<DVec3>,
        faces: Vec<Vec<u32>>,
        adjacency: Vec<Vec<Option<usize>>>,
    ) -> Result<Self, LocusError> {
        validate_faces(&faces, positions.len())?;
        if adjacency.len() != faces.len() {
            return Err(LocusError::invalid_adjacency(format!(
                "{} adjacency rows for {} faces",
                adjacency.len(),
                faces.len()
            )));
        }
        for (face, (row, verts)) in adjacency.iter().zip(&faces).enumerate() {
            if row.len() != verts.len() {
                return Err(LocusError::invalid_adjacency(format!(
                    "face {face} has {} edges but {} adjacency entries",
                    verts.len(),
                    row.len()
                )));
            }
            if let Some(bad) = row.iter().flatten().find(|&&g| g >= faces.len()) {
                return Err(LocusError::invalid_adjacency(format!(
                    "face {face} is adjacent to missing face {bad}"
                )));
            }
        }
        Ok(Self {
            positions,
            faces,
            adjacency,
        })
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Vertex indices of face `f`.
    #[inline]
    pub fn face(&self, f: usize) -> &[u32] {
        &self.faces[f]
    }

    /// Faces across each edge of face `f`.
    #[inline]
    pub fn adjacent(&self, f: usize) -> &[Option<usize>] {
        &self.adjacency[f]
    }

    #[inline]
    pub fn face_has_vertex(&self, f: usize, v: u32) -> bool {
        self.faces[f].contains(&v)
    }
}

fn validate_faces(faces: &[Vec<u32>], vertex_count: usize) -> Result<(), LocusError> {
    for (face, verts) in faces.iter().enumerate() {
        if verts.len() < 3 {
            return Err(LocusError::DegenerateFace {
                face,
                count: verts.len(),
            });
        }
        if let Some(&vertex) = verts.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(LocusError::VertexOutOfRange {
                face,
                vertex,
                vertex_count,
            });
        }
    }
    Ok(())
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

fn face_edges(verts: &[u32]) -> impl Iterator<Item = (usize, (u32, u32))> + '_ {
    (0..verts.len()).map(move |e| (e, edge_key(verts[e], verts[(e + 1) % verts.len()])))
}

fn derive_adjacency(faces: &[Vec<u32>], diagnostics: &mut Diagnostics) -> Vec<Vec<Option<usize>>> {
    let mut edge_map: HashMap<(u32, u32), Vec<(usize, usize)>> = HashMap::new();
    for (f, verts) in faces.iter().enumerate() {
        for (e, key) in face_edges(verts) {
            edge_map.entry(key).or_default().push((f, e));
        }
    }

    faces
        .iter()
        .enumerate()
        .map(|(f, verts)| {
            face_edges(verts)
                .map(|(e, key)| {
                    let sharing = edge_map.get(&key)?;
                    if sharing.len() > 2 && sharing[0] == (f, e) {
                        diagnostics.warn(DiagnosticKind::NonManifoldEdge { face: f, edge: e });
                    }
                    sharing
                        .iter()
                        .find(|&&(g, _)| g != f)
                        .map(|&(g, _)| g)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<DVec3>, Vec<Vec<u32>>) {
        let positions = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![vec![0, 2, 1], vec![0, 1, 3], vec![1, 2, 3], vec![2, 0, 3]];
        (positions, faces)
    }

    #[test]
    fn test_tetrahedron_is_fully_adjacent() {
        let (positions, faces) = tetrahedron();
        let mut diagnostics = Diagnostics::new();
        let mesh = FaceMesh::new(positions, faces, &mut diagnostics).unwrap();

        assert!(diagnostics.is_empty());
        for f in 0..4 {
            let mut neighbours: Vec<usize> = mesh.adjacent(f).iter().flatten().copied().collect();
            neighbours.sort_unstable();
            let expected: Vec<usize> = (0..4).filter(|&g| g != f).collect();
            assert_eq!(neighbours, expected);
        }
    }

    #[test]
    fn test_boundary_edges_have_no_neighbour() {
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y];
        let mesh = FaceMesh::new(positions, vec![vec![0, 1, 2]], &mut Diagnostics::new()).unwrap();
        assert_eq!(mesh.adjacent(0), &[None, None, None]);
    }

    #[test]
    fn test_non_manifold_edge_reported_once() {
        let positions = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z, DVec3::NEG_Y];
        let faces = vec![vec![0, 1, 2], vec![1, 0, 3], vec![0, 1, 4]];
        let mut diagnostics = Diagnostics::new();
        let mesh = FaceMesh::new(positions, faces, &mut diagnostics).unwrap();

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(mesh.adjacent(0)[0], Some(1));
        assert_eq!(mesh.adjacent(1)[0], Some(0));
        assert_eq!(mesh.adjacent(2)[0], Some(0));
    }

    #[test]
    fn test_out_of_range_vertex_rejected() {
        let err = FaceMesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1, 7]], &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, LocusError::VertexOutOfRange { face: 0, vertex: 7, .. }));
    }

    #[test]
    fn test_two_vertex_face_rejected() {
        let err = FaceMesh::new(vec![DVec3::ZERO; 3], vec![vec![0, 1]], &mut Diagnostics::new())
            .unwrap_err();
        assert!(matches!(err, LocusError::DegenerateFace { face: 0, count: 2 }));
    }

    #[test]
    fn test_supplied_adjacency_shape_checked() {
        let (positions, faces) = tetrahedron();
        let short = vec![vec![Some(1), Some(2), Some(3)]; 3];
        assert!(matches!(
            FaceMesh::with_adjacency(positions.clone(), faces.clone(), short),
            Err(LocusError::InvalidAdjacency { .. })
        ));

        let dangling = vec![vec![Some(9), None, None]; 4];
        assert!(FaceMesh::with_adjacency(positions, faces, dangling).is_err());
    }
}
