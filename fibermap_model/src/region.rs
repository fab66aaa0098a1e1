// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Regions: named groups of objects used for filtering.

use serde::{Deserialize, Serialize};

use crate::{CableId, LatLng, ObjectId, RegionId};

/// A region as the region list returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Server-assigned identity.
    #[serde(rename = "region_id", alias = "id")]
    pub id: RegionId,
    /// Unique name, usually the city.
    pub name: String,
    /// Representative coordinate.
    #[serde(flatten)]
    pub position: LatLng,
    /// Full place name from the geocoder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Country component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// State or province component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Geocoder place id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominatim_id: Option<i64>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The payload for creating a region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionDraft {
    /// Unique name.
    pub name: String,
    /// Representative coordinate.
    #[serde(flatten)]
    pub position: LatLng,
    /// Full place name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Country component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// State component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl RegionDraft {
    /// A draft named `name` at `position`.
    pub fn new(name: impl Into<String>, position: LatLng) -> Self {
        Self {
            name: name.into(),
            position,
            display_name: None,
            country: None,
            state: None,
        }
    }
}

/// A region together with its current membership.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionContents {
    /// The region itself.
    #[serde(flatten)]
    pub region: Region,
    /// Member objects.
    #[serde(
        rename = "network_objects",
        default,
        with = "member_ids::objects"
    )]
    pub objects: Vec<ObjectId>,
    /// Member cables.
    #[serde(default, with = "member_ids::cables")]
    pub cables: Vec<CableId>,
}

/// Members arrive as nested records; only their ids matter here.
mod member_ids {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::{CableId, ObjectId};

    #[derive(Deserialize)]
    struct ObjectRef {
        #[serde(alias = "network_object_id")]
        id: ObjectId,
    }

    #[derive(Deserialize)]
    struct CableRef {
        #[serde(alias = "cable_id")]
        id: CableId,
    }

    #[derive(Serialize)]
    struct IdRef<T> {
        id: T,
    }

    pub(super) mod objects {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(ids: &[ObjectId], s: S) -> Result<S::Ok, S::Error> {
            let refs: Vec<_> = ids.iter().map(|&id| IdRef { id }).collect();
            refs.serialize(s)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Vec<ObjectId>, D::Error> {
            let refs = Vec::<ObjectRef>::deserialize(d)?;
            Ok(refs.into_iter().map(|r| r.id).collect())
        }
    }

    pub(super) mod cables {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(ids: &[CableId], s: S) -> Result<S::Ok, S::Error> {
            let refs: Vec<_> = ids.iter().map(|&id| IdRef { id }).collect();
            refs.serialize(s)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Vec<CableId>, D::Error> {
            let refs = Vec::<CableRef>::deserialize(d)?;
            Ok(refs.into_iter().map(|r| r.id).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contents_accept_either_member_key() {
        let json = r#"{
            "region_id": 4, "name": "Lviv", "latitude": 49.84, "longitude": 24.03,
            "network_objects": [{"id": 1, "name": "a"}, {"network_object_id": 2}],
            "cables": [{"id": 10}, {"cable_id": 11}]
        }"#;
        let c: RegionContents = serde_json::from_str(json).unwrap();
        assert_eq!(c.region.id, RegionId(4));
        assert_eq!(c.objects, vec![ObjectId(1), ObjectId(2)]);
        assert_eq!(c.cables, vec![CableId(10), CableId(11)]);
    }

    #[test]
    fn contents_default_to_empty_membership() {
        let json = r#"{"id": 5, "name": "Empty", "latitude": 0.0, "longitude": 0.0}"#;
        let c: RegionContents = serde_json::from_str(json).unwrap();
        assert!(c.objects.is_empty());
        assert!(c.cables.is_empty());
    }
}
