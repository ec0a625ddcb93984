//! # Loop Extraction
//!
//! Walks the pairing table into ordered polylines.
//!
//! ## Architecture
//!
//! ```text
//! Pairing (links + junctions) → LoopBuilder → Vec<Loop> → write_link (debug dump)
//! ```

pub mod builder;
pub mod link;

pub use builder::LoopBuilder;
pub use link::write_link;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// One reconstructed polyline of the double locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loop {
    /// Position in extraction order.
    pub id: usize,
    /// Vertices with near-duplicate neighbours collapsed.
    pub points: Vec<DVec3>,
    /// True if the last vertex connects back to the first.
    pub closed: bool,
}

impl Loop {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of chords: one per consecutive pair, plus the closing chord.
    pub fn segment_count(&self) -> usize {
        match (self.points.len(), self.closed) {
            (0, _) => 0,
            (n, true) => n,
            (n, false) => n - 1,
        }
    }

    /// Total polyline length, including the closing chord of closed loops.
    pub fn length(&self) -> f64 {
        let open: f64 = self
            .points
            .windows(2)
            .map(|w| w[0].distance(w[1]))
            .sum();
        match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(first), Some(last)) => open + last.distance(*first),
            _ => open,
        }
    }
}

#[cfg(test)]
mod tests;
