// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Model: typed records for fiber network maps.
//!
//! This crate holds the data every other Fibermap crate speaks:
//!
//! - [`NetworkObject`]s placed on the map (nodes, couplings, cabinets, and so on).
//! - [`Cable`]s between two objects, with an explicit [`CableKind`] and an
//!   optional fiber count that only optical cables honor.
//! - [`FiberSplice`]s joining one fiber of one cable to one fiber of another.
//! - [`Region`]s grouping objects for filtering.
//! - [`ReferenceData`], the immutable lookup of type names, glyphs, and colors.
//!
//! Records serialize to the JSON shapes the backend uses, so they can be sent
//! and received without an intermediate layer. Forms are modeled separately
//! ([`ObjectDraft`], [`CableDraft`], [`SpliceDraft`], [`RegionDraft`]) and
//! validate themselves before anything is sent.
//!
//! # Example
//!
//! ```rust
//! use fibermap_model::{CableDraft, CableKind, LatLng, ObjectId};
//!
//! let a = LatLng::new(50.4501, 30.5234);
//! let b = LatLng::new(50.4547, 30.5238);
//!
//! let mut draft = CableDraft::between(ObjectId(1), ObjectId(2));
//! draft.name = "Feeder 1".into();
//! draft.fiber_count = Some(24);
//! draft.auto_distance(&a, &b);
//!
//! // Switching to copper drops the fiber count.
//! draft.set_kind(CableKind::Copper);
//! let draft = draft.validated().unwrap();
//! assert_eq!(draft.fiber_count, None);
//! assert!(draft.distance_km.unwrap() > 0.5);
//! ```

mod cable;
mod error;
mod geo;
mod ids;
mod object;
mod reference;
mod region;
mod splice;

pub use cable::{Cable, CableDraft, CableKind};
pub use error::DraftError;
pub use geo::{
    COORDINATE_DECIMALS, EARTH_RADIUS_KM, GeoBounds, LatLng, format_coordinates, format_distance,
    round_to,
};
pub use ids::{CableId, CableTypeId, ObjectId, RegionId, SpliceId};
pub use object::{NetworkObject, ObjectDraft, ObjectKind};
pub use reference::{
    CableTypeRecord, ObjectTypeInfo, ObjectTypeRecord, ReferenceData, fiber_count_color,
    kind_color,
};
pub use region::{Region, RegionContents, RegionDraft};
pub use splice::{FiberEnd, FiberSplice, SpliceDraft};

/// Longest accepted display name, in characters.
pub const MAX_NAME_LENGTH: usize = 255;

/// Smallest fiber count a cable form accepts.
pub const MIN_FIBER_COUNT: u32 = 1;

/// Largest fiber count a cable form accepts.
pub const MAX_FIBER_COUNT: u32 = 1000;
