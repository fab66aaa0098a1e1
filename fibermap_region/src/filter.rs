// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Restrict the visible network to the selected regions.

use fibermap_model::{Cable, NetworkObject, ObjectId, RegionContents};
use hashbrown::HashSet;

/// The objects and cables left visible by a filter pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filtered {
    /// Visible objects, in input order.
    pub objects: Vec<NetworkObject>,
    /// Visible cables, in input order.
    pub cables: Vec<Cable>,
}

/// Keep only what lies inside the union of `selected` regions.
///
/// With no region selected, both inputs come back unchanged. Otherwise an
/// object is kept when any selected region lists it, and a cable is kept
/// when both of its endpoints are kept. An empty union yields empty results.
pub fn filter_by_regions(
    objects: &[NetworkObject],
    cables: &[Cable],
    selected: &[RegionContents],
) -> Filtered {
    if selected.is_empty() {
        return Filtered {
            objects: objects.to_vec(),
            cables: cables.to_vec(),
        };
    }

    let members: HashSet<ObjectId> = selected
        .iter()
        .flat_map(|r| r.objects.iter().copied())
        .collect();

    Filtered {
        objects: objects
            .iter()
            .filter(|o| members.contains(&o.id))
            .cloned()
            .collect(),
        cables: cables
            .iter()
            .filter(|c| members.contains(&c.from) && members.contains(&c.to))
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_model::{CableId, CableKind, LatLng, ObjectKind, Region, RegionId};

    fn object(id: i64) -> NetworkObject {
        NetworkObject {
            id: ObjectId(id),
            name: format!("O{id}"),
            kind: ObjectKind::Node,
            position: LatLng::new(0.0, 0.0),
            address: None,
            description: None,
        }
    }

    fn cable(id: i64, from: i64, to: i64) -> Cable {
        Cable {
            id: CableId(id),
            name: format!("C{id}"),
            kind: CableKind::Optical,
            cable_type_id: None,
            color: None,
            from: ObjectId(from),
            to: ObjectId(to),
            fiber_count: None,
            distance_km: None,
            description: None,
        }
    }

    fn region(id: i64, members: &[i64]) -> RegionContents {
        RegionContents {
            region: Region {
                id: RegionId(id),
                name: format!("R{id}"),
                position: LatLng::new(0.0, 0.0),
                display_name: None,
                country: None,
                state: None,
                nominatim_id: None,
                description: None,
            },
            objects: members.iter().map(|&m| ObjectId(m)).collect(),
            cables: Vec::new(),
        }
    }

    #[test]
    fn no_selection_returns_inputs() {
        let objects = [object(1), object(2), object(3)];
        let cables = [cable(1, 1, 2), cable(2, 2, 3)];
        let out = filter_by_regions(&objects, &cables, &[]);
        assert_eq!(out.objects, objects);
        assert_eq!(out.cables, cables);
    }

    #[test]
    fn cables_need_both_endpoints_inside() {
        let objects = [object(1), object(2), object(3)];
        let cables = [cable(1, 1, 2), cable(2, 2, 3)];
        let out = filter_by_regions(&objects, &cables, &[region(1, &[1, 2])]);
        let ids: Vec<_> = out.objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![ObjectId(1), ObjectId(2)]);
        assert_eq!(out.cables, vec![cable(1, 1, 2)]);
    }

    #[test]
    fn union_of_several_regions() {
        let objects = [object(1), object(2), object(3), object(4)];
        let cables = [cable(1, 1, 3), cable(2, 2, 4)];
        let out = filter_by_regions(&objects, &cables, &[region(1, &[1]), region(2, &[3, 4])]);
        assert_eq!(out.objects.len(), 3);
        assert_eq!(out.cables, vec![cable(1, 1, 3)]);
    }

    #[test]
    fn empty_union_is_empty_not_unfiltered() {
        let objects = [object(1)];
        let cables = [cable(1, 1, 1)];
        let out = filter_by_regions(&objects, &cables, &[region(1, &[])]);
        assert!(out.objects.is_empty());
        assert!(out.cables.is_empty());
    }
}
