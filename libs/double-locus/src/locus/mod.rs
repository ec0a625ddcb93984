//! # Locus Matching
//!
//! Turns an unordered soup of double-locus segments into a pairing table:
//! which endpoint continues into which.
//!
//! - [`endpoint`]: typed indices and the replicated endpoint arena
//! - [`spatial_hash`]: quantized open-addressing table for coincidence tests
//! - [`junction`]: buckets for vertices where more than two endpoints meet
//! - [`pairing`]: the matching driver tying the three together

pub mod endpoint;
pub mod junction;
pub mod pairing;
pub mod spatial_hash;

pub use endpoint::{EndpointId, JunctionId, Link, SegmentSoup};
pub use junction::{Junction, JunctionSet};
pub use pairing::Pairing;
pub use spatial_hash::{neighbour_offsets, Probe, Slot, SpatialHash};
