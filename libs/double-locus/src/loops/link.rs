//! Plain-text LINK dump of extracted loops, for offline inspection.
//!
//! ```text
//! LINK
//! <loop count>
//! <vertex count of loop 0>
//! ...
//!
//! x y z        (vertices of loop 0)
//! ...
//! ```
//!
//! Each loop's vertex block is preceded by a blank line.

use std::io::{self, Write};

use super::Loop;

/// Writes `loops` in LINK format.
///
/// # Example
///
/// ```rust
/// use double_locus::loops::{write_link, Loop};
/// use glam::DVec3;
///
/// let l = Loop { id: 0, points: vec![DVec3::ZERO, DVec3::X], closed: false };
/// let mut out = Vec::new();
/// write_link(&mut out, &[l])?;
/// assert_eq!(String::from_utf8(out).unwrap(), "LINK\n1\n2\n\n0 0 0\n1 0 0\n");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn write_link<W: Write>(mut writer: W, loops: &[Loop]) -> io::Result<()> {
    writeln!(writer, "LINK")?;
    writeln!(writer, "{}", loops.len())?;
    for l in loops {
        writeln!(writer, "{}", l.points.len())?;
    }
    for l in loops {
        writeln!(writer)?;
        for p in &l.points {
            writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
        }
    }
    writer.flush()
}
