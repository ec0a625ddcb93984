//! # Junction Buckets
//!
//! Where more than two endpoints coincide, the plain one-to-one pairing
//! cannot say which segments continue into which. Such endpoints are
//! gathered into a junction bucket and the choice is deferred to the loop
//! walk, which picks the straightest unused continuation.

use serde::{Deserialize, Serialize};

use super::endpoint::{EndpointId, JunctionId, Link};
use super::spatial_hash::{Slot, SpatialHash};

/// Coincident endpoints meeting at one multi-valent vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Junction {
    members: Vec<EndpointId>,
}

impl Junction {
    /// Member endpoints in insertion order.
    pub fn members(&self) -> &[EndpointId] {
        &self.members
    }

    /// Number of endpoints meeting here.
    pub fn fold(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, endpoint: EndpointId) -> bool {
        self.members.contains(&endpoint)
    }

    /// Representative endpoint used for spatial comparison.
    pub fn exemplar(&self) -> Option<EndpointId> {
        self.members.first().copied()
    }

    fn insert(&mut self, endpoint: EndpointId) {
        if !self.members.contains(&endpoint) {
            self.members.push(endpoint);
        }
    }
}

/// All junction buckets of one reconstruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JunctionSet {
    buckets: Vec<Junction>,
}

impl JunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[inline]
    pub fn get(&self, id: JunctionId) -> &Junction {
        &self.buckets[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (JunctionId, &Junction)> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, j)| (JunctionId::new(i), j))
    }

    fn allocate(&mut self) -> JunctionId {
        let id = JunctionId::new(self.buckets.len());
        self.buckets.push(Junction::default());
        id
    }

    /// Moves every member of `from` into `into` and re-links them. `from`
    /// is left empty; slots still naming it never match again.
    fn absorb(&mut self, into: JunctionId, from: JunctionId, links: &mut [Link]) {
        let members = std::mem::take(&mut self.buckets[from.index()].members);
        for member in members {
            self.buckets[into.index()].insert(member);
            links[member.index()] = Link::Junction(into);
        }
    }

    fn insert(&mut self, id: JunctionId, link: Link) {
        if let Link::Endpoint(e) = link {
            self.buckets[id.index()].insert(e);
        }
    }

    /// Folds `current` into the junction at hash slot `slot`.
    ///
    /// Reuses the junction already reached through the slot, `current` or
    /// the slot's exemplar, and allocates one only when none of them is in
    /// a junction yet. If they reach different junctions, the later ones
    /// are merged into the first. The bucket receives `current`, its
    /// present partner, the slot's exemplar and that exemplar's partner;
    /// every one of them is re-linked to the junction, and the slot is left
    /// holding the junction.
    pub fn resolve(
        &mut self,
        current: EndpointId,
        slot: usize,
        hash: &mut SpatialHash,
        links: &mut [Link],
    ) -> JunctionId {
        let occupant = hash.slot(slot);
        let reached = [
            match occupant {
                Slot::Junction(id) => Some(id),
                Slot::Endpoint(exemplar) => links[exemplar.index()].junction(),
                Slot::Empty => None,
            },
            links[current.index()].junction(),
        ];
        let id = match reached.iter().flatten().next() {
            Some(&id) => id,
            None => self.allocate(),
        };
        for other in reached.into_iter().flatten() {
            if other != id {
                self.absorb(id, other, links);
            }
        }
        let token = Link::Junction(id);

        self.insert(id, Link::Endpoint(current));
        self.insert(id, links[current.index()]);
        if let Link::Endpoint(partner) = links[current.index()] {
            self.insert(id, links[partner.index()]);
            links[partner.index()] = token;
        }

        if let Slot::Endpoint(exemplar) = occupant {
            self.insert(id, Link::Endpoint(exemplar));
            self.insert(id, links[exemplar.index()]);
            if let Link::Endpoint(partner) = links[exemplar.index()] {
                links[partner.index()] = token;
            }
            links[exemplar.index()] = token;
        }

        links[current.index()] = token;
        hash.set(slot, Slot::Junction(id));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(i: usize) -> EndpointId {
        EndpointId::new(i)
    }

    #[test]
    fn test_resolve_promotes_plain_pair() {
        let mut hash = SpatialHash::new(6, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 6];
        // 1 <-> 2 already paired, 1 is the slot's exemplar
        links[1] = Link::Endpoint(e(2));
        links[2] = Link::Endpoint(e(1));
        hash.set(5, Slot::Endpoint(e(1)));

        let mut junctions = JunctionSet::new();
        let id = junctions.resolve(e(4), 5, &mut hash, &mut links);

        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions.get(id).members(), &[e(4), e(1), e(2)]);
        for i in [1, 2, 4] {
            assert_eq!(links[i], Link::Junction(id));
        }
        assert_eq!(links[0], Link::Unpaired);
        assert_eq!(hash.slot(5), Slot::Junction(id));
    }

    #[test]
    fn test_resolve_reuses_existing_junction() {
        let mut hash = SpatialHash::new(8, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 8];
        links[1] = Link::Endpoint(e(2));
        links[2] = Link::Endpoint(e(1));
        hash.set(0, Slot::Endpoint(e(1)));

        let mut junctions = JunctionSet::new();
        let first = junctions.resolve(e(4), 0, &mut hash, &mut links);
        let second = junctions.resolve(e(6), 0, &mut hash, &mut links);

        assert_eq!(first, second);
        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions.get(first).fold(), 4);
        assert_eq!(junctions.get(first).exemplar(), Some(e(4)));
    }

    #[test]
    fn test_resolve_through_stale_exemplar_joins_its_junction() {
        let mut hash = SpatialHash::new(8, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 8];
        links[1] = Link::Endpoint(e(2));
        links[2] = Link::Endpoint(e(1));
        // 1 registered in one bucket, 2 in a neighbouring one
        hash.set(3, Slot::Endpoint(e(1)));
        hash.set(0, Slot::Endpoint(e(2)));

        let mut junctions = JunctionSet::new();
        let first = junctions.resolve(e(4), 0, &mut hash, &mut links);
        // slot 3 still names 1, which now lives in the junction
        let second = junctions.resolve(e(6), 3, &mut hash, &mut links);

        assert_eq!(first, second);
        assert_eq!(junctions.len(), 1);
        assert_eq!(junctions.get(first).members(), &[e(4), e(2), e(1), e(6)]);
        for i in [1, 2, 4, 6] {
            assert_eq!(links[i], Link::Junction(first));
        }
        assert_eq!(hash.slot(3), Slot::Junction(first));
    }

    #[test]
    fn test_resolve_merges_two_junctions() {
        let mut hash = SpatialHash::new(8, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 8];
        links[1] = Link::Endpoint(e(2));
        links[2] = Link::Endpoint(e(1));
        links[5] = Link::Endpoint(e(6));
        links[6] = Link::Endpoint(e(5));
        hash.set(0, Slot::Endpoint(e(1)));
        hash.set(2, Slot::Endpoint(e(5)));

        let mut junctions = JunctionSet::new();
        let a = junctions.resolve(e(4), 0, &mut hash, &mut links);
        let b = junctions.resolve(e(7), 2, &mut hash, &mut links);
        assert_ne!(a, b);

        let merged = junctions.resolve(e(4), 2, &mut hash, &mut links);
        assert_eq!(merged, b);
        assert_eq!(junctions.get(a).fold(), 0);
        assert_eq!(junctions.get(b).members(), &[e(7), e(5), e(6), e(4), e(1), e(2)]);
        for i in [1, 2, 4, 5, 6, 7] {
            assert_eq!(links[i], Link::Junction(b));
        }
    }

    #[test]
    fn test_junction_serializes_member_indices() {
        let mut hash = SpatialHash::new(4, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 4];
        hash.set(0, Slot::Endpoint(e(1)));
        let mut junctions = JunctionSet::new();
        let id = junctions.resolve(e(3), 0, &mut hash, &mut links);

        let json = serde_json::to_value(junctions.get(id)).unwrap();
        assert_eq!(json, serde_json::json!({ "members": [3, 1] }));
    }

    #[test]
    fn test_members_never_duplicate() {
        let mut hash = SpatialHash::new(4, 3, 10_000.0);
        let mut links = vec![Link::Unpaired; 4];
        hash.set(0, Slot::Endpoint(e(1)));
        let mut junctions = JunctionSet::new();
        let id = junctions.resolve(e(3), 0, &mut hash, &mut links);
        junctions.resolve(e(3), 0, &mut hash, &mut links);
        assert_eq!(junctions.get(id).members(), &[e(3), e(1)]);
    }
}
