// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deriving region membership, and the set of regions an operator picked.

use fibermap_model::{Cable, NetworkObject, ObjectId, RegionId};
use hashbrown::HashSet;

/// Objects whose address mentions `city`, ignoring case.
///
/// A blank city matches nothing.
pub fn objects_matching_city<'a>(
    objects: &'a [NetworkObject],
    city: &str,
) -> Vec<&'a NetworkObject> {
    let needle = city.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    objects
        .iter()
        .filter(|o| {
            o.address
                .as_deref()
                .is_some_and(|a| a.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Cables with both endpoints in `members`.
pub fn cables_within<'a>(
    cables: &'a [Cable],
    members: impl IntoIterator<Item = ObjectId>,
) -> Vec<&'a Cable> {
    let members: HashSet<ObjectId> = members.into_iter().collect();
    cables
        .iter()
        .filter(|c| members.contains(&c.from) && members.contains(&c.to))
        .collect()
}

/// A region the operator picked for filtering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedRegion {
    /// Backend identity.
    pub id: RegionId,
    /// Display name; unique within a selection.
    pub name: String,
}

/// The ordered set of selected regions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionSelection {
    regions: Vec<SelectedRegion>,
}

impl RegionSelection {
    /// Nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected regions, in the order they were picked.
    pub fn regions(&self) -> &[SelectedRegion] {
        &self.regions
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether a region named `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r.name == name)
    }

    /// Select `region`, or deselect it when a region of the same name is
    /// already selected. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, region: SelectedRegion) -> bool {
        if let Some(pos) = self.regions.iter().position(|r| r.name == region.name) {
            self.regions.remove(pos);
            false
        } else {
            self.regions.push(region);
            true
        }
    }

    /// Select `region` unless one of the same name is already selected.
    pub fn insert(&mut self, region: SelectedRegion) -> bool {
        if self.contains(&region.name) {
            return false;
        }
        self.regions.push(region);
        true
    }

    /// Deselect the region with `id`.
    pub fn remove(&mut self, id: RegionId) -> bool {
        let before = self.regions.len();
        self.regions.retain(|r| r.id != id);
        self.regions.len() != before
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}
