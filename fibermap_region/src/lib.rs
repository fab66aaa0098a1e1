// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Region: named object groups and the filter they drive.
//!
//! A region is a named set of network objects, usually a city. Selecting one
//! or more regions narrows the map to their members:
//!
//! - [`filter_by_regions`] keeps objects listed by any selected region and
//!   cables whose two endpoints are both kept.
//! - [`objects_matching_city`] and [`cables_within`] derive the members of a
//!   new region from object addresses.
//! - [`RegionSelection`] is the ordered set of picked regions; picking a
//!   selected region again deselects it.
//! - [`merge_suggestions`] and [`search_cables`] back the search boxes.
//!
//! Region contents are passed in by the caller and are expected to be
//! fetched fresh for every filter pass.
//!
//! # Example
//!
//! ```rust
//! use fibermap_model::{Cable, CableId, CableKind, LatLng, NetworkObject, ObjectId, ObjectKind};
//! use fibermap_model::{Region, RegionContents, RegionId};
//! use fibermap_region::filter_by_regions;
//!
//! let object = |id| NetworkObject {
//!     id: ObjectId(id),
//!     name: format!("O{id}"),
//!     kind: ObjectKind::Node,
//!     position: LatLng::new(0.0, 0.0),
//!     address: None,
//!     description: None,
//! };
//! let cable = |id, from, to| Cable {
//!     id: CableId(id),
//!     name: format!("C{id}"),
//!     kind: CableKind::Copper,
//!     cable_type_id: None,
//!     color: None,
//!     from: ObjectId(from),
//!     to: ObjectId(to),
//!     fiber_count: None,
//!     distance_km: None,
//!     description: None,
//! };
//! let region = RegionContents {
//!     region: Region {
//!         id: RegionId(1),
//!         name: "Downtown".into(),
//!         position: LatLng::new(0.0, 0.0),
//!         display_name: None,
//!         country: None,
//!         state: None,
//!         nominatim_id: None,
//!         description: None,
//!     },
//!     objects: vec![ObjectId(1), ObjectId(2)],
//!     cables: vec![],
//! };
//!
//! let objects = [object(1), object(2), object(3)];
//! let cables = [cable(1, 1, 2), cable(2, 2, 3)];
//! let visible = filter_by_regions(&objects, &cables, &[region]);
//! assert_eq!(visible.objects.len(), 2);
//! assert_eq!(visible.cables.len(), 1);
//! ```

mod filter;
mod membership;
mod search;

pub use filter::{Filtered, filter_by_regions};
pub use membership::{RegionSelection, SelectedRegion, cables_within, objects_matching_city};
pub use search::{
    MIN_REGION_QUERY_CHARS, RegionCandidate, Suggestion, merge_suggestions, search_cables,
};
