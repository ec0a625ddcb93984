//! # Tube Frames
//!
//! Cross-section frames for extruding loops into tubes.

pub mod framer;
pub mod rotation;

pub use framer::{frame_loop, Frame, FramedLoop};
pub use rotation::geodesic_rotation;

#[cfg(test)]
mod tests;
