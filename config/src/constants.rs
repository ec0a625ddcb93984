//! # Configuration Constants
//!
//! Centralized constants for the double-locus engine. Point matching,
//! loop cleanup, tube framing and distance propagation all read their
//! tolerances from here.
//!
//! ## Categories
//!
//! - **Matching**: Spatial hash quantization and fuzzy point equality
//! - **Loops**: Thresholds for collapsing and closing polylines
//! - **Framing**: Degeneracy cutoffs for tangent estimation
//! - **Distance**: Representable range of the per-face distance byte
//! - **Limits**: Safety bounds on input size and recursion

use std::fmt;

// =============================================================================
// MATCHING CONSTANTS
// =============================================================================

/// Per-coordinate tolerance for treating two segment endpoints as the
/// same point.
///
/// Two points match when every coordinate differs by less than this value.
///
/// # Example
///
/// ```rust
/// use config::constants::LOCUS_MATCH_EPSILON;
///
/// let a = [0.5_f64, 0.25, -1.0];
/// let b = [0.500001_f64, 0.25, -1.0];
/// assert!(a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < LOCUS_MATCH_EPSILON));
/// ```
pub const LOCUS_MATCH_EPSILON: f64 = 2e-5;

/// Scale applied to each coordinate before truncating it to an integer
/// hash digit.
///
/// # Example
///
/// ```rust
/// use config::constants::LOCUS_HASH_SCALE;
///
/// let digit = (0.12345_f64 * LOCUS_HASH_SCALE) as i32;
/// assert_eq!(digit, 1234);
/// ```
pub const LOCUS_HASH_SCALE: f64 = 10_000.0;

/// Multipliers combining the three quantized coordinates into one hash.
pub const LOCUS_HASH_WEIGHTS: [i32; 3] = [1, 11, 37];

/// Hash table slots allocated per endpoint (plus one).
///
/// # Example
///
/// ```rust
/// use config::constants::LOCUS_HASH_LOAD_FACTOR;
///
/// let endpoints = 100;
/// let slots = endpoints * LOCUS_HASH_LOAD_FACTOR + 1;
/// assert_eq!(slots, 301);
/// ```
pub const LOCUS_HASH_LOAD_FACTOR: usize = 3;

// =============================================================================
// LOOP CONSTANTS
// =============================================================================

/// Consecutive loop points closer than this are collapsed into one.
///
/// Also the length below which a junction candidate segment counts as
/// degenerate and is preferred as a continuation.
pub const TINY_SEGMENT_LENGTH: f64 = 0.02;

/// An open loop gets its trailing endpoint appended only when it lies
/// farther than this from the last emitted point.
pub const OPEN_END_GAP: f64 = 5e-4;

// =============================================================================
// FRAMING CONSTANTS
// =============================================================================

/// Squared length below which a summed tangent estimate counts as
/// cancelled.
pub const DEGENERATE_TANGENT_SQ: f64 = 0.01;

/// When a geodesic rotation must turn a vector onto its opposite, the
/// helper axis is `X` if `|a.x|` is below this value and `Y` otherwise.
pub const OPPOSITE_AXIS_THRESHOLD: f64 = 0.7;

/// Lengths below this are treated as zero when normalizing vectors.
///
/// # Example
///
/// ```rust
/// use config::constants::ZERO_LENGTH_EPSILON;
///
/// assert!(1e-15 < ZERO_LENGTH_EPSILON);
/// ```
pub const ZERO_LENGTH_EPSILON: f64 = 1e-12;

// =============================================================================
// DISTANCE CONSTANTS
// =============================================================================

/// Distance value of faces the propagation never reached.
///
/// Also the ceiling every propagated distance is clamped to.
pub const DISTANCE_UNKNOWN: u8 = 255;

/// Distance value of faces lying on the double locus.
pub const DISTANCE_SEED: u8 = 0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Largest rotational symmetry order accepted.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_SYMMETRY_ORDER;
///
/// let order = 6;
/// assert!(order <= MAX_SYMMETRY_ORDER);
/// ```
pub const MAX_SYMMETRY_ORDER: u32 = 1024;

/// Maximum number of endpoints (after symmetry replication) in one
/// reconstruction.
///
/// Endpoint ids are stored as `u32`, and the hash table holds three slots
/// per endpoint.
pub const MAX_LOCUS_ENDPOINTS: usize = 100_000_000;

/// Bytes of stack reserved when the ribbon search grows the stack using
/// the `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of the matching and cleanup tolerances, validated
/// once and shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.match_epsilon > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Per-coordinate tolerance for endpoint matching.
    pub match_epsilon: f64,
    /// Collapse threshold for consecutive loop points.
    pub tiny_segment: f64,
    /// Quantization scale of the spatial hash.
    pub hash_scale: f64,
}

impl GlobalConfig {
    /// Builds a configuration enforcing strict validation of the supplied
    /// tolerances.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-4, 0.05, 1000.0).expect("valid config");
    /// assert_eq!(cfg.hash_scale, 1000.0);
    /// ```
    pub fn new(match_epsilon: f64, tiny_segment: f64, hash_scale: f64) -> Result<Self, ConfigError> {
        if !(match_epsilon > 0.0) || !match_epsilon.is_finite() {
            return Err(ConfigError::InvalidTolerance(match_epsilon));
        }
        if !(tiny_segment >= 0.0) || !tiny_segment.is_finite() {
            return Err(ConfigError::InvalidSegmentLength(tiny_segment));
        }
        if !(hash_scale > 0.0) || !hash_scale.is_finite() {
            return Err(ConfigError::InvalidHashScale(hash_scale));
        }
        Ok(Self {
            match_epsilon,
            tiny_segment,
            hash_scale,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            match_epsilon: LOCUS_MATCH_EPSILON,
            tiny_segment: TINY_SEGMENT_LENGTH,
            hash_scale: LOCUS_HASH_SCALE,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when the match tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the tiny-segment threshold is negative or not finite.
    InvalidSegmentLength(f64),
    /// Raised when the hash scale is zero, negative or not finite.
    InvalidHashScale(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "match tolerance must be positive: {value}")
            }
            ConfigError::InvalidSegmentLength(value) => {
                write!(f, "tiny segment length must be non-negative: {value}")
            }
            ConfigError::InvalidHashScale(value) => {
                write!(f, "hash scale must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Clamps a propagated distance into the representable byte range.
///
/// # Example
///
/// ```rust
/// use config::constants::{clamp_distance, DISTANCE_UNKNOWN};
///
/// assert_eq!(clamp_distance(7), 7);
/// assert_eq!(clamp_distance(1000), DISTANCE_UNKNOWN);
/// ```
#[inline]
pub fn clamp_distance(value: u32) -> u8 {
    value.min(DISTANCE_UNKNOWN as u32) as u8
}
