//! # Locus File Parser
//!
//! Reads the text file describing a mesh's double locus:
//!
//! ```text
//! 12          face indices on the locus, one per line
//! 13
//! -1          any negative number ends the face list
//! 4           endpoint count
//! 0 0 0       endpoints, two per segment
//! 1 0 0
//! 1 0 0
//! 1 1 0
//! ```
//!
//! Blank or non-numeric lines in the face list are skipped. A line that
//! fails to yield three coordinates stops parsing; whatever was read before
//! it is kept.

use std::io::{self, BufRead};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LocusError;

/// Seed faces and raw segment endpoints read from a locus file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocusFile {
    pub seeds: Vec<usize>,
    pub endpoints: Vec<DVec3>,
}

impl LocusFile {
    /// Parses locus text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use double_locus::{Diagnostics, LocusFile};
    ///
    /// let text = "3\n5\n-1\n2\n0 0 0\n1 0 0\n";
    /// let file = LocusFile::parse(text, &mut Diagnostics::new());
    /// assert_eq!(file.seeds, vec![3, 5]);
    /// assert_eq!(file.endpoints.len(), 2);
    /// ```
    pub fn parse(text: &str, diagnostics: &mut Diagnostics) -> Self {
        parse_lines(text.lines().map(|l| Ok(l.to_owned())), diagnostics).unwrap_or_default()
    }

    /// Parses locus text from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`LocusError::Io`] if reading fails.
    pub fn read<R: BufRead>(reader: R, diagnostics: &mut Diagnostics) -> Result<Self, LocusError> {
        parse_lines(reader.lines(), diagnostics)
    }
}

fn parse_lines<I>(lines: I, diagnostics: &mut Diagnostics) -> Result<LocusFile, LocusError>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut lines = lines.into_iter().enumerate().map(|(i, l)| (i + 1, l));
    let mut file = LocusFile::default();

    for (_, line) in lines.by_ref() {
        let Some(value) = leading_int(&line?) else {
            continue;
        };
        if value < 0 {
            break;
        }
        file.seeds.push(value as usize);
    }

    let Some((number, line)) = lines.next() else {
        return Ok(file);
    };
    let line = line?;
    let count = match leading_int(&line) {
        Some(count) if count > 0 => count as usize,
        Some(_) => return Ok(file),
        None => {
            diagnostics.warn(DiagnosticKind::MalformedLocusLine {
                line: number,
                expected: "endpoint count".to_owned(),
                found: line,
            });
            return Ok(file);
        }
    };

    file.endpoints.reserve(count.min(1 << 20));
    for index in 0..count {
        let (number, line) = match lines.next() {
            Some((number, line)) => (number, line?),
            None => {
                diagnostics.warn(DiagnosticKind::MalformedLocusLine {
                    line: number + index + 1,
                    expected: format!("endpoint {index}/{count}"),
                    found: String::new(),
                });
                break;
            }
        };
        match parse_point(&line) {
            Some(p) => file.endpoints.push(p),
            None => {
                diagnostics.warn(DiagnosticKind::MalformedLocusLine {
                    line: number,
                    expected: format!("endpoint {index}/{count}"),
                    found: line,
                });
                break;
            }
        }
    }

    log::debug!(
        "locus file: {} seed faces, {} endpoints",
        file.seeds.len(),
        file.endpoints.len()
    );
    Ok(file)
}

/// Integer at the start of `line` (after leading whitespace), ignoring
/// anything that follows it.
fn leading_int(line: &str) -> Option<i64> {
    let s = line.trim_start();
    let sign_len = usize::from(s.starts_with(['-', '+']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}

/// First three whitespace-separated numbers of `line`. `nan` and `inf`
/// are rejected.
fn parse_point(line: &str) -> Option<DVec3> {
    let mut coords = line.split_whitespace().map(str::parse::<f64>);
    let x = coords.next()?.ok()?;
    let y = coords.next()?.ok()?;
    let z = coords.next()?.ok()?;
    Some(DVec3::new(x, y, z)).filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_comments_in_face_list() {
        let text = "# faces\n\n4\n  7 trailing\nabc\n-1\n0\n";
        let file = LocusFile::parse(text, &mut Diagnostics::new());
        assert_eq!(file.seeds, vec![4, 7]);
        assert!(file.endpoints.is_empty());
    }

    #[test]
    fn test_reads_endpoints() {
        let text = "0\n-1\n4\n0 0 0\n1 0 0\n1 0 0\n1.5 2e-1 -3\n";
        let mut diagnostics = Diagnostics::new();
        let file = LocusFile::parse(text, &mut diagnostics);
        assert_eq!(file.seeds, vec![0]);
        assert_eq!(file.endpoints.len(), 4);
        assert_eq!(file.endpoints[3], DVec3::new(1.5, 0.2, -3.0));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_malformed_point_stops_parsing() {
        let text = "-1\n3\n0 0 0\n1 0\n2 2 2\n";
        let mut diagnostics = Diagnostics::new();
        let file = LocusFile::parse(text, &mut diagnostics);
        assert_eq!(file.endpoints, vec![DVec3::ZERO]);
        assert!(diagnostics.any(|k| matches!(k, DiagnosticKind::MalformedLocusLine { line: 4, .. })));
    }

    #[test]
    fn test_non_finite_point_stops_parsing() {
        for bad in ["nan 0 0", "0 inf 0", "0 0 -infinity"] {
            let text = format!("-1\n2\n1 2 3\n{bad}\n");
            let mut diagnostics = Diagnostics::new();
            let file = LocusFile::parse(&text, &mut diagnostics);
            assert_eq!(file.endpoints, vec![DVec3::new(1.0, 2.0, 3.0)]);
            assert!(diagnostics.any(|k| matches!(k, DiagnosticKind::MalformedLocusLine { line: 4, .. })));
        }
    }

    #[test]
    fn test_truncated_file_keeps_prefix() {
        let text = "-1\n4\n0 0 0\n1 0 0\n";
        let mut diagnostics = Diagnostics::new();
        let file = LocusFile::parse(text, &mut diagnostics);
        assert_eq!(file.endpoints.len(), 2);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_missing_count_is_empty() {
        let file = LocusFile::parse("2\n-1\n", &mut Diagnostics::new());
        assert_eq!(file.seeds, vec![2]);
        assert!(file.endpoints.is_empty());
    }

    #[test]
    fn test_bad_count_line_reported() {
        let mut diagnostics = Diagnostics::new();
        let file = LocusFile::parse("-1\nmany\n0 0 0\n", &mut diagnostics);
        assert!(file.endpoints.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_read_from_buffer() {
        let text = b"1\n-1\n2\n0 0 0\n0 0 1\n";
        let file = LocusFile::read(&text[..], &mut Diagnostics::new()).unwrap();
        assert_eq!(file.endpoints[1], DVec3::Z);
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("  -12abc"), Some(-12));
        assert_eq!(leading_int("+3"), Some(3));
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }
}
