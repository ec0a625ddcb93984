//! # Loop Builder
//!
//! Follows segment chains through the pairing table.
//!
//! ## Walk
//!
//! From an endpoint `i` the walk crosses to its partner, marks the segment
//! it leaves as used, and continues from the far end of the segment it
//! entered. At a junction the continuation is chosen on the spot: the
//! unused member whose segment is most nearly parallel to the incoming
//! one. The walk stops on an unpaired endpoint, an exhausted junction, or
//! a segment that is already used.
//!
//! ## Assembly
//!
//! Each unused segment seeds one loop: a forward walk from its start and,
//! unless that walk came back around, a backward walk from its other end.
//! Points are then emitted from the forward end following the links.

use glam::DVec3;

use crate::config::LocusConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::geometry::unit_and_length;
use crate::locus::{EndpointId, JunctionId, JunctionSet, Link, Pairing, SegmentSoup};

use super::Loop;

/// Per-endpoint usage during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Usage {
    Free,
    /// Never hashed: zero-length or rotated self-image.
    Excluded,
    /// Claimed by a walk; even tags walk forward, odd tags backward.
    Loop(u32),
}

impl Usage {
    #[inline]
    fn is_used(self) -> bool {
        self != Usage::Free
    }
}

/// Extracts loops from a [`Pairing`].
///
/// The builder never mutates the pairing; every [`build`](Self::build)
/// works on fresh copies of the links and usage flags, so repeated builds
/// yield identical loops.
///
/// # Example
///
/// ```rust
/// use double_locus::{Diagnostics, LocusConfig};
/// use double_locus::locus::Pairing;
/// use double_locus::loops::LoopBuilder;
/// use glam::DVec3;
///
/// let a = DVec3::ZERO;
/// let b = DVec3::X;
/// let c = DVec3::new(1.0, 1.0, 0.0);
/// let segments = [a, b, b, c, c, a];
///
/// let config = LocusConfig::default();
/// let mut diagnostics = Diagnostics::new();
/// let pairing = Pairing::build(&segments, &config, &mut diagnostics)?;
/// let loops = LoopBuilder::new(&pairing, &config).build(&mut diagnostics);
///
/// assert_eq!(loops.len(), 1);
/// assert!(loops[0].closed);
/// assert_eq!(loops[0].points.len(), 3);
/// # Ok::<(), double_locus::LocusError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoopBuilder<'a> {
    pairing: &'a Pairing,
    tiny_segment: f64,
    open_end_gap: f64,
}

impl<'a> LoopBuilder<'a> {
    pub fn new(pairing: &'a Pairing, config: &LocusConfig) -> Self {
        Self {
            pairing,
            tiny_segment: config.tiny_segment,
            open_end_gap: config.open_end_gap,
        }
    }

    /// Walks every unused segment into a loop.
    pub fn build(&self, diagnostics: &mut Diagnostics) -> Vec<Loop> {
        let soup = self.pairing.soup();
        let mut walker = Walker {
            soup,
            junctions: self.pairing.junctions(),
            links: self.pairing.links().to_vec(),
            usage: self
                .pairing
                .excluded()
                .iter()
                .map(|&excluded| if excluded { Usage::Excluded } else { Usage::Free })
                .collect(),
            tiny_segment: self.tiny_segment,
        };

        let mut loops = Vec::new();
        for start in soup.ids().filter(|id| id.is_start()) {
            if walker.is_used(start) {
                continue;
            }
            let tag = loops.len() as u32 * 2;

            let forward = walker.follow(start, tag, diagnostics);
            let mut end0 = forward.end;
            let mut segments = forward.segments;
            let mut end1 = if walker.links[start.twin().index()] == Link::Endpoint(end0) {
                start.twin()
            } else {
                segments += 1;
                let backward = walker.follow(start.twin(), tag + 1, diagnostics);
                segments += backward.segments;
                backward.end
            };

            if !walker.is_used(start) {
                end0 = start;
                end1 = start.twin();
                walker.mark(start, tag);
                segments = 1;
            }

            let cyclic = walker.links[end0.index()] == Link::Endpoint(end1);
            if cyclic && segments <= 2 {
                diagnostics.info(DiagnosticKind::DegenerateCycle {
                    endpoint: end0.raw(),
                });
                continue;
            }
            let closed = (cyclic || end0.twin() == end1) && segments > 2;

            let points = walker.emit(end0, end1, segments, closed, self.open_end_gap);
            if points.len() <= 1 {
                continue;
            }
            loops.push(Loop {
                id: loops.len(),
                points,
                closed,
            });
        }

        log::debug!(
            "extracted {} loops ({} closed) from {} segments",
            loops.len(),
            loops.iter().filter(|l| l.closed).count(),
            soup.segment_count()
        );
        loops
    }
}

/// Where a walk ended and how many segments it claimed.
#[derive(Debug, Clone, Copy)]
struct Walked {
    end: EndpointId,
    segments: usize,
}

/// Working copies of links and usage for one build.
struct Walker<'a> {
    soup: &'a SegmentSoup,
    junctions: &'a JunctionSet,
    links: Vec<Link>,
    usage: Vec<Usage>,
    tiny_segment: f64,
}

impl Walker<'_> {
    #[inline]
    fn is_used(&self, id: EndpointId) -> bool {
        self.usage[id.index()].is_used()
    }

    /// Claims both endpoints of `id`'s segment.
    #[inline]
    fn mark(&mut self, id: EndpointId, tag: u32) {
        self.usage[id.index()] = Usage::Loop(tag);
        self.usage[id.twin().index()] = Usage::Loop(tag);
    }

    /// Unit vector from the twin to `id`, and the segment length.
    fn direction(&self, id: EndpointId) -> (DVec3, f64) {
        unit_and_length(self.soup.point(id) - self.soup.point(id.twin()))
    }

    fn follow(&mut self, start: EndpointId, tag: u32, diagnostics: &mut Diagnostics) -> Walked {
        let mut i = start;
        let mut segments = 0;

        loop {
            let next = match self.links[i.index()] {
                Link::Unpaired => break,
                Link::Endpoint(next) => next,
                Link::Junction(junction) => match self.continuation(i, junction) {
                    Some(next) => {
                        self.links[i.index()] = Link::Endpoint(next);
                        self.links[next.index()] = Link::Endpoint(i);
                        next
                    }
                    None => {
                        diagnostics.info(DiagnosticKind::JunctionExhausted {
                            token: junction.token(),
                            fold: self.junctions.get(junction).fold(),
                            endpoint: i.raw(),
                            point: self.soup.point(i),
                        });
                        break;
                    }
                },
            };

            if self.links[next.index()] != Link::Endpoint(i) {
                diagnostics.warn(DiagnosticKind::BrokenBackLink {
                    from: i.raw(),
                    to: next.raw(),
                    found: self.links[next.index()].to_string(),
                });
                self.links[next.index()] = Link::Endpoint(i);
            }

            self.mark(i, tag);
            segments += 1;
            if self.is_used(next) {
                break;
            }
            i = next.twin();
        }

        if let Link::Endpoint(partner) = self.links[i.index()] {
            if !self.is_used(partner) {
                i = partner.twin();
                self.mark(i, tag);
                segments += 1;
            }
        }
        if !self.is_used(i) {
            self.mark(i, tag);
            segments += 1;
        }

        Walked { end: i, segments }
    }

    /// Picks the unused junction member most nearly parallel to the segment
    /// arriving at `from`. Short members count as parallel; ties go to the
    /// later member.
    fn continuation(&self, from: EndpointId, junction: JunctionId) -> Option<EndpointId> {
        let (incoming, _) = self.direction(from);
        let mut best = None;
        let mut best_dot = f64::NEG_INFINITY;

        for &member in self.junctions.get(junction).members() {
            if member == from || member == from.twin() || self.is_used(member) {
                continue;
            }
            let (outgoing, length) = self.direction(member);
            let dot = if length < self.tiny_segment {
                1.0
            } else {
                incoming.dot(outgoing).abs()
            };
            if best_dot <= dot {
                best_dot = dot;
                best = Some(member);
            }
        }
        best
    }

    /// Collects loop vertices from `end0` along the links, collapsing
    /// points closer than the tiny-segment length.
    fn emit(
        &self,
        end0: EndpointId,
        end1: EndpointId,
        segments: usize,
        closed: bool,
        open_end_gap: f64,
    ) -> Vec<DVec3> {
        let mut points: Vec<DVec3> = Vec::with_capacity(segments + 1);
        let mut cursor = Some(end0);

        for _ in 0..segments {
            let Some(k) = cursor else { break };
            let p = self.soup.point(k);
            if points
                .last()
                .map_or(true, |last| last.distance(p) > self.tiny_segment)
            {
                points.push(p);
            }
            cursor = self.links[k.twin().index()].endpoint();
        }

        if !closed {
            let tail = self.soup.point(end1);
            if let Some(last) = points.last() {
                if last.distance(tail) > open_end_gap {
                    points.push(tail);
                }
            }
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_repairs_one_sided_link() {
        let (a, b, c, d) = (DVec3::ZERO, DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y);
        let config = LocusConfig::default();
        let mut diagnostics = Diagnostics::new();
        let pairing = Pairing::build(&[a, b, b, c, c, d, d, a], &config, &mut diagnostics)
            .expect("pairing");

        let mut links = pairing.links().to_vec();
        // 2 still points at 1, but 1 lost its side of the pair
        links[1] = Link::Unpaired;
        let mut walker = Walker {
            soup: pairing.soup(),
            junctions: pairing.junctions(),
            links,
            usage: vec![Usage::Free; pairing.endpoint_count()],
            tiny_segment: config.tiny_segment,
        };

        let walked = walker.follow(EndpointId::new(0), 0, &mut diagnostics);

        assert_eq!(walked.end, EndpointId::new(2));
        assert_eq!(walked.segments, 4);
        assert_eq!(walker.links[1], Link::Endpoint(EndpointId::new(2)));
        assert!(diagnostics.any(|k| matches!(
            k,
            DiagnosticKind::BrokenBackLink { from: 2, to: 1, found } if found == "-1"
        )));
    }
}
