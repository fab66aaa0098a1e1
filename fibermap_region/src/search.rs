// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text search over cables and region suggestions.

use fibermap_model::{Cable, LatLng, NetworkObject, ObjectId, Region};
use hashbrown::HashMap;

/// Minimum query length before the geocoder is consulted for regions.
pub const MIN_REGION_QUERY_CHARS: usize = 2;

/// Cables whose name, or either endpoint's address, contains `term`,
/// ignoring case. A blank term matches every cable.
pub fn search_cables<'a>(
    cables: &'a [Cable],
    objects: &[NetworkObject],
    term: &str,
) -> Vec<&'a Cable> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return cables.iter().collect();
    }
    let addresses: HashMap<ObjectId, String> = objects
        .iter()
        .filter_map(|o| Some((o.id, o.address.as_deref()?.to_lowercase())))
        .collect();
    let address_matches = |id: ObjectId| addresses.get(&id).is_some_and(|a| a.contains(&needle));
    cables
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle)
                || address_matches(c.from)
                || address_matches(c.to)
        })
        .collect()
}

/// A settlement offered by the geocoder that has no region yet.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionCandidate {
    /// Short name, usually the city.
    pub name: String,
    /// Full place name.
    pub display_name: String,
    /// Representative coordinate.
    pub position: LatLng,
    /// Geocoder place id.
    pub osm_id: Option<i64>,
}

/// One entry of the region picker.
#[derive(Clone, Debug, PartialEq)]
pub enum Suggestion {
    /// A region already stored by the backend.
    Existing(Region),
    /// A place that would create a new region.
    Place(RegionCandidate),
}

impl Suggestion {
    /// The name shown and compared for de-duplication.
    pub fn name(&self) -> &str {
        match self {
            Self::Existing(r) => &r.name,
            Self::Place(p) => &p.name,
        }
    }

    /// Representative coordinate.
    pub fn position(&self) -> LatLng {
        match self {
            Self::Existing(r) => r.position,
            Self::Place(p) => p.position,
        }
    }
}

/// Merge stored regions matching `query` with geocoder `places`.
///
/// Stored regions come first and win over places of the same name. Names are
/// compared ignoring case. The result is sorted by name. A query shorter than
/// [`MIN_REGION_QUERY_CHARS`] lists every stored region and ignores places.
pub fn merge_suggestions(
    existing: &[Region],
    query: &str,
    places: Vec<RegionCandidate>,
) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    let short = query.chars().count() < MIN_REGION_QUERY_CHARS;

    let stored = existing
        .iter()
        .filter(|r| short || r.name.to_lowercase().contains(&query))
        .cloned()
        .map(Suggestion::Existing);
    let found = places
        .into_iter()
        .filter(|_| !short)
        .map(Suggestion::Place);

    let mut out: Vec<Suggestion> = Vec::new();
    for suggestion in stored.chain(found) {
        let key = suggestion.name().to_lowercase();
        if !out.iter().any(|s| s.name().to_lowercase() == key) {
            out.push(suggestion);
        }
    }
    out.sort_by_cached_key(|s| s.name().to_lowercase());
    out
}
