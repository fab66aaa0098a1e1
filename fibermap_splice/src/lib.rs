// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Splice: the fiber-splice consistency model.
//!
//! A splice joins one fiber of one cable to one fiber of another. This crate
//! decides which splices may exist and keeps the list visible from the
//! selected cable:
//!
//! - [`validate_splice`] gates a proposed splice. It rejects, in order, a
//!   fiber spliced to itself, fibers that do not exist, cables that do not
//!   meet, exact duplicates, and source fibers already in use.
//! - [`SpliceStore`] holds the records for the cable in scope, answers
//!   "which splice uses this fiber", and classifies fiber slots for rendering.
//! - [`FiberPairing`] turns click-click and drag-and-drop gestures into
//!   `(source, target)` pairs.
//!
//! Creating a splice is three steps: [`SpliceStore::check`], persist through
//! the backend, then [`SpliceStore::insert`] the returned record. A rejected
//! check never reaches the backend.
//!
//! # Example
//!
//! ```rust
//! use fibermap_graph::build_adjacency;
//! use fibermap_model::{Cable, CableId, CableKind, FiberEnd, ObjectId, SpliceDraft, SpliceId};
//! use fibermap_splice::{SpliceError, SpliceStore};
//!
//! let cable = |id, from, to| Cable {
//!     id: CableId(id),
//!     name: format!("C{id}"),
//!     kind: CableKind::Optical,
//!     cable_type_id: None,
//!     color: None,
//!     from: ObjectId(from),
//!     to: ObjectId(to),
//!     fiber_count: Some(8),
//!     distance_km: None,
//!     description: None,
//! };
//! let graph = build_adjacency(&[cable(1, 1, 2), cable(2, 2, 3)]);
//!
//! let mut store = SpliceStore::new();
//! store.focus(Some(CableId(1)));
//!
//! let a0 = FiberEnd::new(CableId(1), 0);
//! let draft = SpliceDraft::new(a0, FiberEnd::new(CableId(2), 0));
//! store.check(&graph, &draft).unwrap();
//! // ... the backend persists it and returns id 1 ...
//! store.insert(draft.into_splice(SpliceId(1)));
//!
//! let again = SpliceDraft::new(a0, FiberEnd::new(CableId(2), 1));
//! assert!(matches!(
//!     store.check(&graph, &again),
//!     Err(SpliceError::FiberAlreadyUsed { .. })
//! ));
//! ```

mod error;
mod pairing;
mod store;
mod validate;

pub use error::{FiberFault, SpliceError};
pub use pairing::{FiberPairing, PairingOutcome};
pub use store::{SlotState, SpliceStore};
pub use validate::{check_fiber, validate_splice};
