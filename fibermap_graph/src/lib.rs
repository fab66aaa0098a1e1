// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Graph: cable adjacency and object reachability.
//!
//! [`build_adjacency`] indexes a cable list into a [`CableGraph`], which answers:
//!
//! - whether an object is an endpoint of a cable ([`CableGraph::is_endpoint`]),
//! - whether two cables meet at a common object ([`CableGraph::adjacent`]),
//!   the gate for splicing their fibers together,
//! - which cables end at an object ([`CableGraph::cables_at`]), the set that
//!   has to be deleted before the object itself,
//! - which objects hang off a cable through any chain of cables
//!   ([`CableGraph::reachable_objects`]), used to highlight dependents.
//!
//! Adjacency is direct-neighbor only; reachability is its transitive
//! counterpart over objects. The graph is a snapshot: rebuild it whenever the
//! cable list changes.
//!
//! # Example
//!
//! ```rust
//! use fibermap_graph::build_adjacency;
//! use fibermap_model::{Cable, CableId, CableKind, ObjectId};
//!
//! let cable = |id, from, to| Cable {
//!     id: CableId(id),
//!     name: format!("C{id}"),
//!     kind: CableKind::Optical,
//!     cable_type_id: None,
//!     color: None,
//!     from: ObjectId(from),
//!     to: ObjectId(to),
//!     fiber_count: Some(12),
//!     distance_km: None,
//!     description: None,
//! };
//! let cables = [cable(1, 1, 2), cable(2, 2, 3), cable(3, 4, 5)];
//! let graph = build_adjacency(&cables);
//!
//! assert!(graph.adjacent(CableId(1), CableId(2)));
//! assert!(!graph.adjacent(CableId(1), CableId(3)));
//!
//! let reach = graph.reachable_objects(CableId(1));
//! assert_eq!(reach.len(), 3);
//! assert!(!reach.contains(&ObjectId(4)));
//! ```

mod graph;
mod reach;

pub use graph::{CableEntry, CableGraph, build_adjacency};
pub use reach::ObjectSet;
