// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transitive reachability over the cable graph.

use std::collections::VecDeque;

use fibermap_model::{CableId, ObjectId};
use hashbrown::HashSet;

use crate::CableGraph;

/// A set of objects, as returned by reachability queries.
pub type ObjectSet = HashSet<ObjectId>;

impl CableGraph {
    /// Every object connected to `start` by any chain of cables, including
    /// both of its endpoints.
    ///
    /// Breadth-first from the two endpoints. Objects are marked visited when
    /// they are enqueued, so each object is expanded at most once and cycles
    /// terminate. The result does not depend on the order cables were
    /// indexed in. An unknown cable yields an empty set.
    pub fn reachable_objects(&self, start: CableId) -> ObjectSet {
        let mut visited = ObjectSet::new();
        let Some(entry) = self.cable(start) else {
            return visited;
        };

        let mut queue = VecDeque::new();
        for seed in [entry.from, entry.to] {
            if visited.insert(seed) {
                queue.push_back(seed);
            }
        }

        while let Some(object) = queue.pop_front() {
            for cable in self.incident(object) {
                let Some(next) = self.cable(*cable).and_then(|c| c.other_end(object)) else {
                    continue;
                };
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
    }

    /// Every cable with at least one endpoint in the set reachable from
    /// `start`, sorted by id.
    pub fn reachable_cables(&self, start: CableId) -> Vec<CableId> {
        let objects = self.reachable_objects(start);
        let mut out: Vec<CableId> = objects
            .iter()
            .flat_map(|o| self.incident(*o).iter().copied())
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_adjacency;
    use fibermap_model::{Cable, CableKind};

    fn cable(id: i64, from: i64, to: i64) -> Cable {
        Cable {
            id: CableId(id),
            name: format!("C{id}"),
            kind: CableKind::Copper,
            cable_type_id: None,
            color: None,
            from: ObjectId(from),
            to: ObjectId(to),
            fiber_count: None,
            distance_km: None,
            description: None,
        }
    }

    fn set(ids: &[i64]) -> ObjectSet {
        ids.iter().map(|&i| ObjectId(i)).collect()
    }

    #[test]
    fn chain_is_fully_reachable() {
        let g = build_adjacency(&[cable(1, 1, 2), cable(2, 2, 3), cable(3, 3, 4)]);
        assert_eq!(g.reachable_objects(CableId(1)), set(&[1, 2, 3, 4]));
        assert_eq!(g.reachable_objects(CableId(3)), set(&[1, 2, 3, 4]));
    }

    #[test]
    fn result_is_independent_of_cable_order() {
        let base = [cable(1, 1, 2), cable(2, 2, 3), cable(3, 3, 4), cable(4, 7, 8)];
        let expected = set(&[1, 2, 3, 4]);
        let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [2, 0, 3, 1], [1, 3, 0, 2]];
        for order in orders {
            let cables: Vec<Cable> = order.iter().map(|&i| base[i].clone()).collect();
            let g = build_adjacency(&cables);
            assert_eq!(g.reachable_objects(CableId(1)), expected, "order {order:?}");
        }
    }

    #[test]
    fn cycles_terminate() {
        let g = build_adjacency(&[
            cable(1, 1, 2),
            cable(2, 2, 3),
            cable(3, 3, 1),
            cable(4, 3, 3),
            cable(5, 1, 2),
        ]);
        assert_eq!(g.reachable_objects(CableId(2)), set(&[1, 2, 3]));
    }

    #[test]
    fn disconnected_components_stay_apart() {
        let g = build_adjacency(&[cable(1, 1, 2), cable(2, 5, 6), cable(3, 6, 7)]);
        assert_eq!(g.reachable_objects(CableId(1)), set(&[1, 2]));
        assert_eq!(g.reachable_objects(CableId(2)), set(&[5, 6, 7]));
        assert!(g.reachable_objects(CableId(99)).is_empty());
    }

    #[test]
    fn repeated_queries_agree() {
        let g = build_adjacency(&[cable(1, 1, 2), cable(2, 2, 3)]);
        assert_eq!(g.reachable_objects(CableId(1)), g.reachable_objects(CableId(1)));
    }

    #[test]
    fn reachable_cables_cover_the_component() {
        let g = build_adjacency(&[cable(4, 1, 2), cable(2, 2, 3), cable(9, 8, 9)]);
        assert_eq!(g.reachable_cables(CableId(4)), vec![CableId(2), CableId(4)]);
    }
}
