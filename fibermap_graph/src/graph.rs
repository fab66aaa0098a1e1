// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Endpoint and adjacency index over a cable list.

use core::fmt::Debug;

use fibermap_model::{Cable, CableId, ObjectId};
use hashbrown::HashMap;
use smallvec::SmallVec;

/// What the index remembers about one cable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CableEntry {
    /// Start object.
    pub from: ObjectId,
    /// End object.
    pub to: ObjectId,
    /// Addressable fibers, if the cable can take part in a splice.
    pub fiber_capacity: Option<u32>,
}

impl CableEntry {
    /// Whether `object` is one of the endpoints.
    pub fn touches(&self, object: ObjectId) -> bool {
        self.from == object || self.to == object
    }

    /// The endpoint opposite `object`.
    pub fn other_end(&self, object: ObjectId) -> Option<ObjectId> {
        if self.from == object {
            Some(self.to)
        } else if self.to == object {
            Some(self.from)
        } else {
            None
        }
    }
}

#[derive(Clone, Default)]
struct Incidence {
    cables: SmallVec<[CableId; 4]>,
}

/// Build the adjacency view of `cables`.
///
/// The view is a snapshot; build a new one whenever the cable list changes.
pub fn build_adjacency<'a>(cables: impl IntoIterator<Item = &'a Cable>) -> CableGraph {
    let mut graph = CableGraph::default();
    for cable in cables {
        graph.insert(cable);
    }
    graph
}

/// Per-cable endpoints plus per-object incident cables.
///
/// Two cables are *adjacent* when at least one endpoint of one equals an
/// endpoint of the other. The relation is symmetric, every known cable is
/// adjacent to itself, and it is not transitive.
#[derive(Clone, Default)]
pub struct CableGraph {
    cables: HashMap<CableId, CableEntry>,
    incidence: HashMap<ObjectId, Incidence>,
}

impl Debug for CableGraph {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CableGraph")
            .field("cables", &self.cables.len())
            .field("objects", &self.incidence.len())
            .finish_non_exhaustive()
    }
}

impl CableGraph {
    fn insert(&mut self, cable: &Cable) {
        let entry = CableEntry {
            from: cable.from,
            to: cable.to,
            fiber_capacity: cable.fiber_capacity(),
        };
        // A repeated id replaces the earlier record.
        if let Some(old) = self.cables.insert(cable.id, entry) {
            for end in [old.from, old.to] {
                if let Some(inc) = self.incidence.get_mut(&end) {
                    inc.cables.retain(|c| *c != cable.id);
                }
            }
        }
        self.incidence
            .entry(cable.from)
            .or_default()
            .cables
            .push(cable.id);
        if cable.to != cable.from {
            self.incidence
                .entry(cable.to)
                .or_default()
                .cables
                .push(cable.id);
        }
    }

    /// Number of indexed cables.
    pub fn len(&self) -> usize {
        self.cables.len()
    }

    /// Whether no cable is indexed.
    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    /// The indexed record for `cable`.
    pub fn cable(&self, cable: CableId) -> Option<&CableEntry> {
        self.cables.get(&cable)
    }

    /// Addressable fibers of `cable`, if it is known and has any.
    pub fn fiber_capacity(&self, cable: CableId) -> Option<u32> {
        self.cables.get(&cable).and_then(|c| c.fiber_capacity)
    }

    /// Whether `object` is an endpoint of `cable`.
    pub fn is_endpoint(&self, object: ObjectId, cable: CableId) -> bool {
        self.cables.get(&cable).is_some_and(|c| c.touches(object))
    }

    /// Whether `a` and `b` share an endpoint. Unknown cables are never
    /// adjacent.
    pub fn adjacent(&self, a: CableId, b: CableId) -> bool {
        let (Some(a), Some(b)) = (self.cables.get(&a), self.cables.get(&b)) else {
            return false;
        };
        a.to == b.to || a.to == b.from || a.from == b.to || a.from == b.from
    }

    /// Cables incident to `object`, sorted by id.
    pub fn cables_at(&self, object: ObjectId) -> Vec<CableId> {
        let mut out: Vec<CableId> = self
            .incidence
            .get(&object)
            .map(|inc| inc.cables.to_vec())
            .unwrap_or_default();
        out.sort_unstable();
        out
    }

    /// Cables adjacent to `cable`, excluding itself, sorted by id.
    pub fn neighbors(&self, cable: CableId) -> Vec<CableId> {
        let Some(entry) = self.cables.get(&cable) else {
            return Vec::new();
        };
        let mut out: Vec<CableId> = [entry.from, entry.to]
            .iter()
            .filter_map(|end| self.incidence.get(end))
            .flat_map(|inc| inc.cables.iter().copied())
            .filter(|c| *c != cable)
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    pub(crate) fn incident(&self, object: ObjectId) -> &[CableId] {
        self.incidence
            .get(&object)
            .map(|inc| inc.cables.as_slice())
            .unwrap_or_default()
    }
}
