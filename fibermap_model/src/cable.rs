// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cables between two network objects.

use serde::{Deserialize, Serialize};

use crate::geo::round_to;
use crate::object::{non_blank, validate_name};
use crate::{
    CableId, CableTypeId, DraftError, LatLng, MAX_FIBER_COUNT, MIN_FIBER_COUNT, ObjectId,
};

/// Physical medium of a cable.
///
/// This is an explicit field of every cable. It is never inferred from the
/// fiber count; instead the fiber count is only honored for optical cables.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CableKind {
    /// Fiber-optic cable with individually addressable fibers.
    #[default]
    Optical,
    /// Copper cable; carries no fiber addressing.
    Copper,
}

/// A cable as the backend returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cable {
    /// Server-assigned identity.
    #[serde(alias = "cable_id")]
    pub id: CableId,
    /// Display name.
    pub name: String,
    /// Medium. Records that predate the field read as optical.
    #[serde(rename = "cable_type", default)]
    pub kind: CableKind,
    /// Row in the cable-type reference table, when one was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_type_id: Option<CableTypeId>,
    /// Stored display color, with or without a leading `#`.
    #[serde(
        rename = "cable_type_color",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub color: Option<String>,
    /// Start object.
    #[serde(rename = "from_object_id")]
    pub from: ObjectId,
    /// End object.
    #[serde(rename = "to_object_id")]
    pub to: ObjectId,
    /// Declared number of fibers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_count: Option<u32>,
    /// Route length in kilometers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Cable {
    /// The number of addressable fibers, if this cable can take part in a
    /// splice.
    ///
    /// Copper cables and optical cables without a positive fiber count have
    /// no fiber-level addressing.
    pub fn fiber_capacity(&self) -> Option<u32> {
        match self.kind {
            CableKind::Optical => self.fiber_count.filter(|&n| n > 0),
            CableKind::Copper => None,
        }
    }

    /// Both endpoints, in stored order.
    pub fn endpoints(&self) -> [ObjectId; 2] {
        [self.from, self.to]
    }

    /// Whether `object` is one of this cable's endpoints.
    pub fn touches(&self, object: ObjectId) -> bool {
        self.from == object || self.to == object
    }

    /// The endpoint opposite `object`, or `None` if `object` is not an
    /// endpoint.
    pub fn other_end(&self, object: ObjectId) -> Option<ObjectId> {
        if self.from == object {
            Some(self.to)
        } else if self.to == object {
            Some(self.from)
        } else {
            None
        }
    }

    /// Whether the two cables meet at a common object.
    pub fn shares_endpoint(&self, other: &Self) -> bool {
        self.touches(other.from) || self.touches(other.to)
    }
}

/// The create/edit form for a cable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CableDraft {
    /// Display name.
    pub name: String,
    /// Medium.
    #[serde(rename = "cable_type")]
    pub kind: CableKind,
    /// Row in the cable-type reference table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cable_type_id: Option<CableTypeId>,
    /// Start object.
    #[serde(rename = "from_object_id")]
    pub from: Option<ObjectId>,
    /// End object.
    #[serde(rename = "to_object_id")]
    pub to: Option<ObjectId>,
    /// Declared fibers; only kept for optical cables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_count: Option<u32>,
    /// Route length in kilometers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Whether `distance_km` was typed by the operator.
    #[serde(skip)]
    pub distance_overridden: bool,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CableDraft {
    /// A form pre-filled with two endpoints, as the draw-cable tool produces.
    pub fn between(from: ObjectId, to: ObjectId) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    /// Change the medium. Switching to copper clears the fiber count.
    pub fn set_kind(&mut self, kind: CableKind) {
        self.kind = kind;
        if kind == CableKind::Copper {
            self.fiber_count = None;
        }
    }

    /// Record a distance typed by the operator, disabling auto-fill.
    pub fn override_distance(&mut self, km: f64) {
        self.distance_km = Some(km);
        self.distance_overridden = true;
    }

    /// Fill the distance from endpoint positions unless the operator set it.
    ///
    /// The auto-filled value is the great-circle distance rounded to meters.
    pub fn auto_distance(&mut self, from: &LatLng, to: &LatLng) {
        if !self.distance_overridden {
            self.distance_km = Some(round_to(from.haversine_km(to), 3));
        }
    }

    /// Check the form and return it normalized for submission.
    pub fn validated(mut self) -> Result<Self, DraftError> {
        self.name = validate_name(&self.name)?;
        let (Some(from), Some(to)) = (self.from, self.to) else {
            return Err(DraftError::MissingEndpoint);
        };
        if from == to {
            return Err(DraftError::LoopCable);
        }
        if self.kind == CableKind::Copper {
            self.fiber_count = None;
        }
        if let Some(n) = self.fiber_count {
            if !(MIN_FIBER_COUNT..=MAX_FIBER_COUNT).contains(&n) {
                return Err(DraftError::InvalidFiberCount(n));
            }
        }
        if let Some(km) = self.distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(DraftError::InvalidDistance(km));
            }
        }
        self.description = non_blank(self.description);
        Ok(self)
    }
}

impl From<&Cable> for CableDraft {
    fn from(cable: &Cable) -> Self {
        Self {
            name: cable.name.clone(),
            kind: cable.kind,
            cable_type_id: cable.cable_type_id,
            from: Some(cable.from),
            to: Some(cable.to),
            fiber_count: cable.fiber_count,
            distance_km: cable.distance_km,
            distance_overridden: cable.distance_km.is_some(),
            description: cable.description.clone(),
        }
    }
}
