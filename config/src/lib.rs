//! # Config Crate
//!
//! Centralized configuration constants for the double-locus engine.
//! All magic numbers and tunable tolerances are defined here so the
//! matching, loop-building, framing and distance stages agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{LOCUS_MATCH_EPSILON, LOCUS_HASH_SCALE};
//!
//! // Two endpoints closer than the tolerance on every axis are one point
//! let dx: f64 = 0.00001;
//! assert!(dx.abs() < LOCUS_MATCH_EPSILON);
//!
//! // Quantize a coordinate the way the spatial hash does
//! let digit = (1.5 * LOCUS_HASH_SCALE) as i32;
//! assert_eq!(digit, 15_000);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values

pub mod constants;
