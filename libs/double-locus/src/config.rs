//! Engine-level configuration building on the shared `config` crate.
//!
//! The shared crate owns the literal tolerances; this module bundles them
//! with the per-invocation symmetry order and validates the combination.

use config::constants::{
    GlobalConfig, LOCUS_HASH_LOAD_FACTOR, MAX_SYMMETRY_ORDER, OPEN_END_GAP,
};

use crate::error::LocusError;

/// Settings for one reconstruction.
///
/// # Examples
/// ```
/// use double_locus::LocusConfig;
/// let cfg = LocusConfig::default().with_symmetry(4);
/// assert_eq!(cfg.symmetry_order, 4);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocusConfig {
    /// Per-coordinate endpoint match tolerance.
    pub match_epsilon: f64,
    /// Collapse threshold for consecutive loop points.
    pub tiny_segment: f64,
    /// Spatial hash quantization scale.
    pub hash_scale: f64,
    /// Hash slots per endpoint (at least one is always used).
    pub hash_load_factor: usize,
    /// Minimum gap before an open loop's trailing endpoint is appended.
    pub open_end_gap: f64,
    /// Rotational symmetry order about the `z` axis (1 = none).
    pub symmetry_order: u32,
}

impl LocusConfig {
    /// Creates a configuration from validated shared tolerances.
    pub fn from_global(global: GlobalConfig) -> Self {
        Self {
            match_epsilon: global.match_epsilon,
            tiny_segment: global.tiny_segment,
            hash_scale: global.hash_scale,
            hash_load_factor: LOCUS_HASH_LOAD_FACTOR,
            open_end_gap: OPEN_END_GAP,
            symmetry_order: 1,
        }
    }

    pub fn with_symmetry(mut self, order: u32) -> Self {
        self.symmetry_order = order;
        self
    }

    pub fn with_match_epsilon(mut self, epsilon: f64) -> Self {
        self.match_epsilon = epsilon;
        self
    }

    pub fn with_tiny_segment(mut self, length: f64) -> Self {
        self.tiny_segment = length;
        self
    }

    /// Checks every field, returning the first violation.
    pub fn validate(&self) -> Result<(), LocusError> {
        GlobalConfig::new(self.match_epsilon, self.tiny_segment, self.hash_scale)?;
        if self.symmetry_order == 0 || self.symmetry_order > MAX_SYMMETRY_ORDER {
            return Err(LocusError::invalid_symmetry(
                self.symmetry_order,
                MAX_SYMMETRY_ORDER,
            ));
        }
        Ok(())
    }
}

impl Default for LocusConfig {
    fn default() -> Self {
        Self::from_global(GlobalConfig::default())
    }
}
