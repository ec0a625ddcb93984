//! # Endpoint Arena
//!
//! Typed indices for segment endpoints and junctions, and the arena holding
//! every endpoint position including rotated symmetry copies.
//!
//! Segment `k` owns endpoints `2k` and `2k + 1`, so the other end of any
//! endpoint is one bit-flip away ([`EndpointId::twin`]).

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

use crate::geometry::rotate_about_z;

/// Index of one segment endpoint.
///
/// # Example
///
/// ```rust
/// use double_locus::locus::EndpointId;
///
/// let e = EndpointId::new(6);
/// assert_eq!(e.twin(), EndpointId::new(7));
/// assert_eq!(e.twin().twin(), e);
/// assert_eq!(e.segment(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EndpointId(u32);

impl EndpointId {
    /// Wraps an arena index. Arena sizes are bounded well below `u32::MAX`.
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The other endpoint of the same segment.
    #[inline]
    pub fn twin(self) -> Self {
        Self(self.0 ^ 1)
    }

    /// Index of the segment owning this endpoint.
    #[inline]
    pub fn segment(self) -> usize {
        (self.0 >> 1) as usize
    }

    /// True for the first endpoint (`2k`) of its segment.
    #[inline]
    pub fn is_start(self) -> bool {
        self.0 & 1 == 0
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of one junction bucket.
///
/// The integer token form `-3 - index` keeps junction references
/// distinguishable from endpoint indices and from the unpaired marker
/// `-1` in flat dumps and diagnostics.
///
/// # Example
///
/// ```rust
/// use double_locus::locus::JunctionId;
///
/// let j = JunctionId::new(2);
/// assert_eq!(j.token(), -5);
/// assert_eq!(JunctionId::from_token(-5), Some(j));
/// assert_eq!(JunctionId::from_token(-1), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JunctionId(u32);

impl JunctionId {
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn token(self) -> i64 {
        -3 - self.0 as i64
    }

    pub fn from_token(token: i64) -> Option<Self> {
        if token <= -3 {
            Some(Self((-3 - token) as u32))
        } else {
            None
        }
    }
}

/// Pairing-table entry for one endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Unpaired,
    Endpoint(EndpointId),
    Junction(JunctionId),
}

impl Link {
    /// Integer form: `-1` unpaired, the endpoint index, or a junction token.
    pub fn raw(self) -> i64 {
        match self {
            Link::Unpaired => -1,
            Link::Endpoint(e) => e.raw() as i64,
            Link::Junction(j) => j.token(),
        }
    }

    #[inline]
    pub fn endpoint(self) -> Option<EndpointId> {
        match self {
            Link::Endpoint(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn junction(self) -> Option<JunctionId> {
        match self {
            Link::Junction(j) => Some(j),
            _ => None,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// All endpoint positions: the base segments followed by one rotated copy
/// of them per nontrivial symmetry rotation.
#[derive(Debug, Clone)]
pub struct SegmentSoup {
    points: Vec<DVec3>,
    base_len: usize,
    symmetry_order: u32,
}

impl SegmentSoup {
    /// Replicates `base` under `symmetry_order`-fold rotation about `z`.
    ///
    /// `base` must hold an even number of points; copy `r` occupies
    /// `r * base.len() .. (r + 1) * base.len()` and is rotated by
    /// `2πr / symmetry_order`.
    pub fn replicate(base: &[DVec3], symmetry_order: u32) -> Self {
        let order = symmetry_order.max(1);
        let base_len = base.len() & !1;
        let mut points = Vec::with_capacity(base_len * order as usize);
        points.extend_from_slice(&base[..base_len]);

        for r in 1..order {
            let angle = TAU * r as f64 / order as f64;
            let (sin, cos) = angle.sin_cos();
            points.extend(base[..base_len].iter().map(|&p| rotate_about_z(p, cos, sin)));
        }

        Self {
            points,
            base_len,
            symmetry_order: order,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    #[inline]
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    #[inline]
    pub fn symmetry_order(&self) -> u32 {
        self.symmetry_order
    }

    #[inline]
    pub fn point(&self, id: EndpointId) -> DVec3 {
        self.points[id.index()]
    }

    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// The unrotated endpoint this one was copied from.
    #[inline]
    pub fn source_of(&self, id: EndpointId) -> EndpointId {
        if self.base_len == 0 {
            return id;
        }
        EndpointId::new(id.index() % self.base_len)
    }

    /// Which rotation copy (0 = base) holds this endpoint.
    #[inline]
    pub fn copy_of(&self, id: EndpointId) -> usize {
        if self.base_len == 0 {
            return 0;
        }
        id.index() / self.base_len
    }

    pub fn ids(&self) -> impl Iterator<Item = EndpointId> {
        (0..self.points.len()).map(EndpointId::new)
    }
}
