//! # Endpoint Pairing
//!
//! Builds the pairing table for a segment soup: every endpoint ends up
//! linked to the one endpoint coinciding with it, to a junction when more
//! than two coincide, or left unpaired.
//!
//! ## Algorithm
//!
//! 1. Replicate the base segments under the symmetry order
//! 2. Exclude zero-length base segments and rotated self-images
//! 3. Probe each remaining endpoint's home bucket: register it, pair it
//!    with a free exemplar, or fold it into a junction
//! 4. Sweep the 27 neighbouring digit offsets for endpoints still unpaired
//!    (points that quantized across a digit boundary)

use config::constants::MAX_LOCUS_ENDPOINTS;
use glam::DVec3;

use super::endpoint::{EndpointId, Link, SegmentSoup};
use super::junction::JunctionSet;
use super::spatial_hash::{neighbour_offsets, Probe, Slot, SpatialHash};
use crate::config::LocusConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::LocusError;
use crate::geometry::points_match;

/// Result of matching a segment soup: links, exclusions and junctions.
///
/// Read-only once built; [`LoopBuilder`](crate::loops::LoopBuilder) works
/// on its own copy of the links.
#[derive(Debug, Clone)]
pub struct Pairing {
    soup: SegmentSoup,
    links: Vec<Link>,
    excluded: Vec<bool>,
    junctions: JunctionSet,
}

impl Pairing {
    /// Matches the endpoints of `base` (pairs of points, one segment each)
    /// under the configured symmetry order.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or when the replicated
    /// soup exceeds `MAX_LOCUS_ENDPOINTS`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use double_locus::{Diagnostics, LocusConfig};
    /// use double_locus::locus::{EndpointId, Link, Pairing};
    /// use glam::DVec3;
    ///
    /// let segments = [DVec3::ZERO, DVec3::X, DVec3::X, DVec3::Y];
    /// let mut diagnostics = Diagnostics::new();
    /// let pairing = Pairing::build(&segments, &LocusConfig::default(), &mut diagnostics)?;
    /// assert_eq!(pairing.link(EndpointId::new(1)), Link::Endpoint(EndpointId::new(2)));
    /// # Ok::<(), double_locus::LocusError>(())
    /// ```
    pub fn build(
        base: &[DVec3],
        config: &LocusConfig,
        diagnostics: &mut Diagnostics,
    ) -> Result<Self, LocusError> {
        config.validate()?;

        if base.len() % 2 == 1 {
            diagnostics.warn(DiagnosticKind::OddEndpointCount { count: base.len() });
        }
        let total = (base.len() & !1).saturating_mul(config.symmetry_order as usize);
        if total > MAX_LOCUS_ENDPOINTS {
            return Err(LocusError::TooManyEndpoints {
                count: total,
                max: MAX_LOCUS_ENDPOINTS,
            });
        }

        let soup = SegmentSoup::replicate(base, config.symmetry_order);
        let excluded = find_excluded(&soup, config.match_epsilon);

        let mut matcher = Matcher {
            soup: &soup,
            hash: SpatialHash::new(soup.len(), config.hash_load_factor, config.hash_scale),
            links: vec![Link::Unpaired; soup.len()],
            junctions: JunctionSet::new(),
            epsilon: config.match_epsilon,
        };

        for id in soup.ids() {
            if !excluded[id.index()] {
                matcher.find_or_register(id);
            }
        }

        for id in soup.ids() {
            if excluded[id.index()] || matcher.links[id.index()] != Link::Unpaired {
                continue;
            }
            let found = neighbour_offsets().any(|delta| matcher.find_offset(id, delta));
            if !found {
                diagnostics.info(DiagnosticKind::UnmatchedEndpoint {
                    endpoint: id.raw(),
                    point: soup.point(id),
                });
            }
        }

        let Matcher {
            links, junctions, ..
        } = matcher;

        log::debug!(
            "paired {} endpoints ({} segments, symmetry {}): {} junctions",
            soup.len(),
            soup.segment_count(),
            soup.symmetry_order(),
            junctions.len()
        );

        Ok(Self {
            soup,
            links,
            excluded,
            junctions,
        })
    }

    pub fn soup(&self) -> &SegmentSoup {
        &self.soup
    }

    #[inline]
    pub fn endpoint_count(&self) -> usize {
        self.soup.len()
    }

    #[inline]
    pub fn link(&self, id: EndpointId) -> Link {
        self.links[id.index()]
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[inline]
    pub fn is_excluded(&self, id: EndpointId) -> bool {
        self.excluded[id.index()]
    }

    pub fn excluded(&self) -> &[bool] {
        &self.excluded
    }

    pub fn junctions(&self) -> &JunctionSet {
        &self.junctions
    }

    /// Endpoints left without any partner (excluded ones are not counted).
    pub fn unmatched(&self) -> impl Iterator<Item = EndpointId> + '_ {
        self.soup
            .ids()
            .filter(move |&id| !self.is_excluded(id) && self.link(id) == Link::Unpaired)
    }

    /// Checks that the link table and junction buckets agree.
    ///
    /// - Plain links are symmetric
    /// - Every junction-linked endpoint is a member of exactly that one
    ///   junction, and every member is linked to its junction
    /// - Excluded endpoints are unpaired
    pub fn is_consistent(&self) -> bool {
        let mut membership = vec![0usize; self.links.len()];
        for (id, junction) in self.junctions.iter() {
            for &member in junction.members() {
                membership[member.index()] += 1;
                if self.link(member) != Link::Junction(id) {
                    return false;
                }
            }
        }

        self.soup.ids().all(|id| {
            let in_buckets = membership[id.index()];
            let link_ok = match self.link(id) {
                Link::Unpaired => in_buckets == 0,
                Link::Endpoint(other) => {
                    in_buckets == 0 && self.link(other) == Link::Endpoint(id)
                }
                Link::Junction(_) => in_buckets == 1,
            };
            link_ok && (!self.is_excluded(id) || self.link(id) == Link::Unpaired)
        })
    }
}

/// Marks endpoints that must never be hashed: bit-identical base segments
/// (with all of their copies) and rotated segments whose rotated start
/// lands on the unrotated end.
fn find_excluded(soup: &SegmentSoup, epsilon: f64) -> Vec<bool> {
    let mut excluded = vec![false; soup.len()];
    let base_len = soup.base_len();
    let points = soup.points();

    for start in (0..base_len).step_by(2) {
        if points[start] == points[start + 1] {
            for copy in 0..soup.symmetry_order() as usize {
                excluded[copy * base_len + start] = true;
                excluded[copy * base_len + start + 1] = true;
            }
        }
    }

    for start in (base_len..soup.len()).step_by(2) {
        let source_end = (start % base_len) + 1;
        if points_match(points[start], points[source_end], epsilon) {
            excluded[start] = true;
            excluded[start + 1] = true;
        }
    }

    excluded
}

/// Working state while the hash table is being filled.
struct Matcher<'a> {
    soup: &'a SegmentSoup,
    hash: SpatialHash,
    links: Vec<Link>,
    junctions: JunctionSet,
    epsilon: f64,
}

impl Matcher<'_> {
    /// Probes from the endpoint's home bucket; registers it on a miss.
    fn find_or_register(&mut self, id: EndpointId) {
        let start = self.hash.bucket(self.soup.point(id));
        match self.probe(id, start, false) {
            Probe::Vacant(slot) => self.hash.set(slot, Slot::Endpoint(id)),
            Probe::Found(slot) => self.join(id, slot),
        }
    }

    /// Probes from a digit-shifted bucket without registering. Returns
    /// true if a partner or junction was found.
    fn find_offset(&mut self, id: EndpointId, delta: [i32; 3]) -> bool {
        let start = self.hash.bucket_offset(self.soup.point(id), delta);
        match self.probe(id, start, true) {
            Probe::Vacant(_) => false,
            Probe::Found(slot) => {
                self.join(id, slot);
                true
            }
        }
    }

    fn probe(&self, id: EndpointId, start: usize, skip_self: bool) -> Probe {
        let point = self.soup.point(id);
        let soup = self.soup;
        let junctions = &self.junctions;
        let epsilon = self.epsilon;
        self.hash.probe(start, |slot| {
            let exemplar = match slot {
                Slot::Endpoint(e) if skip_self && e == id => return false,
                Slot::Endpoint(e) => e,
                Slot::Junction(j) => match junctions.get(j).exemplar() {
                    Some(e) => e,
                    None => return false,
                },
                Slot::Empty => return false,
            };
            points_match(point, soup.point(exemplar), epsilon)
        })
    }

    /// Pairs `id` with the exemplar at `slot`, or folds both into a
    /// junction when the slot is already a junction or its exemplar is
    /// taken.
    fn join(&mut self, id: EndpointId, slot: usize) {
        match self.hash.slot(slot) {
            Slot::Endpoint(exemplar) if self.links[exemplar.index()] == Link::Unpaired => {
                self.links[id.index()] = Link::Endpoint(exemplar);
                self.links[exemplar.index()] = Link::Endpoint(id);
            }
            Slot::Endpoint(_) | Slot::Junction(_) => {
                self.junctions
                    .resolve(id, slot, &mut self.hash, &mut self.links);
            }
            Slot::Empty => {}
        }
    }
}
