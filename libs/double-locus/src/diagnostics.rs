//! # Diagnostics
//!
//! Non-fatal findings collected while matching, walking and propagating.
//! Each entry is kept for the caller and mirrored to the `log` facade.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Info,
}

/// What the engine ran into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// No spatial partner, even after the neighbouring-bucket sweep.
    UnmatchedEndpoint { endpoint: u32, point: DVec3 },
    /// Every member of a junction was already used when the walk arrived.
    JunctionExhausted {
        token: i64,
        fold: usize,
        endpoint: u32,
        point: DVec3,
    },
    /// `from` links to `to`, but `to` linked to `found`; overwritten.
    BrokenBackLink { from: u32, to: u32, found: String },
    /// A cycle of at most two segments (a doubled segment) was discarded.
    DegenerateCycle { endpoint: u32 },
    /// A locus file line could not be parsed; reading stopped there.
    MalformedLocusLine {
        line: usize,
        expected: String,
        found: String,
    },
    /// A seed face index beyond the mesh was ignored.
    SeedOutOfRange { face: usize, face_count: usize },
    /// An odd number of endpoints was supplied; the last one was dropped.
    OddEndpointCount { count: usize },
    /// More than two faces share an edge; the first neighbour was kept.
    NonManifoldEdge { face: usize, edge: usize },
}

/// A diagnostic message with severity and structured detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind) -> Self {
        let message = describe(&kind);
        Self {
            severity,
            kind,
            message,
        }
    }

    pub fn warning(kind: DiagnosticKind) -> Self {
        Self::new(Severity::Warning, kind)
    }

    pub fn info(kind: DiagnosticKind) -> Self {
        Self::new(Severity::Info, kind)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{label}: {}", self.message)
    }
}

fn describe(kind: &DiagnosticKind) -> String {
    match kind {
        DiagnosticKind::UnmatchedEndpoint { endpoint, point } => format!(
            "unmatched endpoint {endpoint} at [{:.5} {:.5} {:.5}]",
            point.x, point.y, point.z
        ),
        DiagnosticKind::JunctionExhausted {
            token,
            fold,
            endpoint,
            point,
        } => format!(
            "{fold}-fold vertex [{token}] {endpoint}: {:.5} {:.5} {:.5}",
            point.x, point.y, point.z
        ),
        DiagnosticKind::BrokenBackLink { from, to, found } => {
            format!("broken back-link: {from} => {to} but {to} => {found}")
        }
        DiagnosticKind::DegenerateCycle { endpoint } => {
            format!("discarded two-segment cycle starting at endpoint {endpoint}")
        }
        DiagnosticKind::MalformedLocusLine {
            line,
            expected,
            found,
        } => format!("line {line}: expected {expected}, got {found:?}"),
        DiagnosticKind::SeedOutOfRange { face, face_count } => {
            format!("seed face {face} out of range ({face_count} faces)")
        }
        DiagnosticKind::OddEndpointCount { count } => {
            format!("odd endpoint count {count}; dropped the last endpoint")
        }
        DiagnosticKind::NonManifoldEdge { face, edge } => {
            format!("edge {edge} of face {face} is shared by more than two faces")
        }
    }
}

/// Ordered collection of diagnostics from one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and forwards it to the logger.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Warning => log::warn!("{}", diagnostic.message),
            Severity::Info => log::debug!("{}", diagnostic.message),
        }
        self.entries.push(diagnostic);
    }

    pub fn warn(&mut self, kind: DiagnosticKind) {
        self.push(Diagnostic::warning(kind));
    }

    pub fn info(&mut self, kind: DiagnosticKind) {
        self.push(Diagnostic::info(kind));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Returns true if any entry satisfies `predicate`.
    pub fn any(&self, predicate: impl Fn(&DiagnosticKind) -> bool) -> bool {
        self.entries.iter().any(|d| predicate(&d.kind))
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_derived_from_kind() {
        let diag = Diagnostic::warning(DiagnosticKind::SeedOutOfRange {
            face: 12,
            face_count: 4,
        });
        assert!(diag.message.contains("12"));
        assert_eq!(diag.to_string(), format!("warning: {}", diag.message));
    }

    #[test]
    fn test_junction_message_reports_fold() {
        let diag = Diagnostic::info(DiagnosticKind::JunctionExhausted {
            token: -3,
            fold: 4,
            endpoint: 9,
            point: DVec3::ZERO,
        });
        assert!(diag.message.starts_with("4-fold vertex [-3] 9"));
    }

    #[test]
    fn test_collection_preserves_order() {
        let mut diags = Diagnostics::new();
        diags.warn(DiagnosticKind::OddEndpointCount { count: 3 });
        diags.info(DiagnosticKind::DegenerateCycle { endpoint: 0 });
        assert_eq!(diags.len(), 2);
        let kinds: Vec<_> = diags.iter().map(|d| d.severity).collect();
        assert_eq!(kinds, vec![Severity::Warning, Severity::Info]);
        assert!(diags.any(|k| matches!(k, DiagnosticKind::DegenerateCycle { .. })));
    }

    #[test]
    fn test_serializes_to_json() {
        let mut diags = Diagnostics::new();
        diags.warn(DiagnosticKind::UnmatchedEndpoint {
            endpoint: 5,
            point: DVec3::new(1.0, 2.0, 3.0),
        });
        let json = serde_json::to_value(&diags).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));
        assert!(json[0]["kind"].get("UnmatchedEndpoint").is_some());
    }
}
