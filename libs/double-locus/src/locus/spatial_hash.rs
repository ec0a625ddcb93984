//! # Spatial Hash for Endpoint Matching
//!
//! Open-addressing hash table over quantized 3-D points. Each slot holds
//! one exemplar endpoint (or a junction standing for all of its members),
//! so a probe from a point's bucket finds the first slot whose exemplar
//! coincides with it.
//!
//! ## Quantization
//!
//! Each coordinate is scaled, truncated toward zero, and the three digits
//! are combined as `x + 11y + 37z` with wrapping arithmetic. Points that
//! match within tolerance usually share a bucket; those straddling a digit
//! boundary are found by probing the 26 neighbouring digit offsets.

use config::constants::LOCUS_HASH_WEIGHTS;
use glam::DVec3;

use super::endpoint::{EndpointId, JunctionId};

/// Content of one hash table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Empty,
    Endpoint(EndpointId),
    Junction(JunctionId),
}

/// Outcome of a probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Slot index whose occupant satisfied the predicate.
    Found(usize),
    /// First empty slot reached; nothing matched.
    Vacant(usize),
}

/// Every digit offset in `{-1, 0, 1}³`, in sweep order.
pub fn neighbour_offsets() -> impl Iterator<Item = [i32; 3]> {
    (-1..=1).flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| [dx, dy, dz])))
}

/// Linear-probing hash table keyed by quantized position.
///
/// # Example
///
/// ```rust
/// use double_locus::locus::{EndpointId, Probe, Slot, SpatialHash};
/// use glam::DVec3;
///
/// let mut hash = SpatialHash::new(4, 3, 10_000.0);
/// let start = hash.bucket(DVec3::new(0.5, 0.5, 0.0));
/// let Probe::Vacant(slot) = hash.probe(start, |_| false) else { unreachable!() };
/// hash.set(slot, Slot::Endpoint(EndpointId::new(0)));
/// assert_eq!(hash.occupied(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialHash {
    slots: Vec<Slot>,
    scale: f64,
}

impl SpatialHash {
    /// Creates a table with `endpoint_count * load_factor + 1` empty slots.
    pub fn new(endpoint_count: usize, load_factor: usize, scale: f64) -> Self {
        let len = endpoint_count * load_factor.max(1) + 1;
        Self {
            slots: vec![Slot::Empty; len],
            scale,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of non-empty slots.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| **s != Slot::Empty).count()
    }

    /// Home bucket of `point`.
    #[inline]
    pub fn bucket(&self, point: DVec3) -> usize {
        self.bucket_offset(point, [0, 0, 0])
    }

    /// Home bucket of `point` after shifting each quantized digit by
    /// `delta`.
    pub fn bucket_offset(&self, point: DVec3, delta: [i32; 3]) -> usize {
        let digits = [
            self.quantize(point.x).wrapping_add(delta[0]),
            self.quantize(point.y).wrapping_add(delta[1]),
            self.quantize(point.z).wrapping_add(delta[2]),
        ];
        let combined = digits
            .iter()
            .zip(LOCUS_HASH_WEIGHTS.iter())
            .fold(0i32, |acc, (&d, &w)| acc.wrapping_add(d.wrapping_mul(w)));
        (combined as u32 as usize) % self.slots.len()
    }

    #[inline]
    fn quantize(&self, coord: f64) -> i32 {
        (coord * self.scale) as i32
    }

    #[inline]
    pub fn slot(&self, index: usize) -> Slot {
        self.slots[index]
    }

    #[inline]
    pub fn set(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
    }

    /// Walks slots from `start` with wraparound until `matches` accepts an
    /// occupied slot or an empty slot is reached.
    ///
    /// The table always keeps at least one empty slot, so the walk ends.
    pub fn probe(&self, start: usize, mut matches: impl FnMut(Slot) -> bool) -> Probe {
        let len = self.slots.len();
        let mut h = start % len;
        for _ in 0..len {
            match self.slots[h] {
                Slot::Empty => return Probe::Vacant(h),
                occupant => {
                    if matches(occupant) {
                        return Probe::Found(h);
                    }
                }
            }
            h += 1;
            if h >= len {
                h = 0;
            }
        }
        // Only reachable on a completely full table.
        Probe::Vacant(start % len)
    }
}
