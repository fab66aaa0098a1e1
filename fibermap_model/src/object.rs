// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Network objects: the points cables run between.

use serde::{Deserialize, Serialize};

use crate::{DraftError, LatLng, MAX_NAME_LENGTH, ObjectId};

/// What a network object physically is.
///
/// Serialized as the lowercase tag the backend stores. The legacy tag `mufa`
/// reads as [`ObjectKind::Coupling`].
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    /// Distribution node.
    Node,
    /// Splice closure joining cables.
    #[serde(alias = "mufa")]
    #[strum(to_string = "coupling", serialize = "mufa")]
    Coupling,
    /// Street cabinet.
    Cabinet,
    /// Optical splitter.
    Splitter,
    /// Subscriber premises.
    Subscriber,
    /// Utility pole.
    Pole,
    /// Cable well or manhole.
    Well,
    /// Surveillance camera.
    Camera,
    /// Wireless access point.
    Wifi,
}

impl ObjectKind {
    /// Built-in display name, used until reference data says otherwise.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Node => "Node",
            Self::Coupling => "Coupling",
            Self::Cabinet => "Cabinet",
            Self::Splitter => "Splitter",
            Self::Subscriber => "Subscriber",
            Self::Pole => "Pole",
            Self::Well => "Well",
            Self::Camera => "Camera",
            Self::Wifi => "Wi-Fi",
        }
    }

    /// Built-in map marker glyph.
    pub fn default_emoji(self) -> &'static str {
        match self {
            Self::Node => "⚙️",
            Self::Coupling => "📦",
            Self::Cabinet => "🗃️",
            Self::Splitter => "🔀",
            Self::Subscriber => "🏠",
            Self::Pole => "⚡",
            Self::Well => "🕳️",
            Self::Camera => "📷",
            Self::Wifi => "📡",
        }
    }
}

/// A placed network object as the backend returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkObject {
    /// Server-assigned identity.
    #[serde(alias = "network_object_id")]
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Object type tag.
    #[serde(rename = "object_type")]
    pub kind: ObjectKind,
    /// Map position.
    #[serde(flatten)]
    pub position: LatLng,
    /// Postal address, usually filled by reverse geocoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The create/edit form for a network object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectDraft {
    /// Display name, trimmed on validation.
    pub name: String,
    /// Object type tag.
    #[serde(rename = "object_type")]
    pub kind: ObjectKind,
    /// Map position.
    #[serde(flatten)]
    pub position: LatLng,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectDraft {
    /// An empty form for `kind` at `position`.
    pub fn new(kind: ObjectKind, position: LatLng) -> Self {
        Self {
            name: String::new(),
            kind,
            position,
            address: None,
            description: None,
        }
    }

    /// Check the form and return it with the name trimmed and blank optional
    /// fields dropped.
    pub fn validated(mut self) -> Result<Self, DraftError> {
        self.name = validate_name(&self.name)?;
        if !self.position.is_valid() {
            return Err(DraftError::InvalidCoordinates {
                latitude: self.position.latitude,
                longitude: self.position.longitude,
            });
        }
        self.address = non_blank(self.address);
        self.description = non_blank(self.description);
        Ok(self)
    }
}

impl From<&NetworkObject> for ObjectDraft {
    fn from(object: &NetworkObject) -> Self {
        Self {
            name: object.name.clone(),
            kind: object.kind,
            position: object.position,
            address: object.address.clone(),
            description: object.description.clone(),
        }
    }
}

pub(crate) fn validate_name(name: &str) -> Result<String, DraftError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DraftError::MissingName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(DraftError::NameTooLong(len));
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_parses_legacy_coupling_tag() {
        assert_eq!(ObjectKind::from_str("mufa").unwrap(), ObjectKind::Coupling);
        assert_eq!(ObjectKind::from_str("coupling").unwrap(), ObjectKind::Coupling);
        assert_eq!(ObjectKind::Coupling.to_string(), "coupling");
        let parsed: ObjectKind = serde_json::from_str("\"mufa\"").unwrap();
        assert_eq!(parsed, ObjectKind::Coupling);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"coupling\"");
    }

    #[test]
    fn object_reads_backend_shape() {
        let json = r#"{
            "network_object_id": 7,
            "name": "Cabinet A",
            "object_type": "cabinet",
            "latitude": 50.45,
            "longitude": 30.52,
            "address": "Main St 1, Kyiv"
        }"#;
        let obj: NetworkObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.id, ObjectId(7));
        assert_eq!(obj.kind, ObjectKind::Cabinet);
        assert_eq!(obj.position, LatLng::new(50.45, 30.52));
        assert_eq!(obj.description, None);
    }

    #[test]
    fn draft_validation() {
        let mut draft = ObjectDraft::new(ObjectKind::Pole, LatLng::new(10.0, 10.0));
        assert_eq!(draft.clone().validated(), Err(DraftError::MissingName));

        draft.name = "  Pole 3  ".into();
        draft.address = Some("   ".into());
        let ok = draft.clone().validated().unwrap();
        assert_eq!(ok.name, "Pole 3");
        assert_eq!(ok.address, None);

        draft.name = "x".repeat(MAX_NAME_LENGTH + 1);
        assert!(matches!(
            draft.clone().validated(),
            Err(DraftError::NameTooLong(_))
        ));

        draft.name = "ok".into();
        draft.position = LatLng::new(100.0, 0.0);
        assert!(matches!(
            draft.validated(),
            Err(DraftError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn every_kind_has_defaults() {
        use strum::IntoEnumIterator;
        for kind in ObjectKind::iter() {
            assert!(!kind.default_name().is_empty());
            assert!(!kind.default_emoji().is_empty());
        }
    }
}
