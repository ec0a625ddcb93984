//! # Locus Errors
//!
//! Error types for caller-contract violations. Everything the engine can
//! recover from (unmatched endpoints, exhausted junctions, malformed locus
//! lines) is reported as a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! instead.

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur when the engine is handed unusable input.
#[derive(Debug, Error)]
pub enum LocusError {
    /// Invalid tolerance configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Symmetry order outside `1..=max`
    #[error("Invalid symmetry order: {order} (expected 1..={max})")]
    InvalidSymmetry { order: u32, max: u32 },

    /// Too many endpoints after symmetry replication
    #[error("Too many locus endpoints: {count} (max: {max})")]
    TooManyEndpoints { count: usize, max: usize },

    /// Face references a vertex that does not exist
    #[error("Face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    VertexOutOfRange {
        face: usize,
        vertex: u32,
        vertex_count: usize,
    },

    /// Face with fewer than three vertices
    #[error("Face {face} has {count} vertices (need at least 3)")]
    DegenerateFace { face: usize, count: usize },

    /// Adjacency table does not line up with the faces
    #[error("Invalid adjacency: {message}")]
    InvalidAdjacency { message: String },

    /// Failure reading a locus file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LocusError {
    /// Creates an invalid symmetry error.
    pub fn invalid_symmetry(order: u32, max: u32) -> Self {
        Self::InvalidSymmetry { order, max }
    }

    /// Creates an invalid adjacency error.
    pub fn invalid_adjacency(message: impl Into<String>) -> Self {
        Self::InvalidAdjacency {
            message: message.into(),
        }
    }
}
