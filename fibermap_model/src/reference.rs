// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference data: display names and glyphs for object types, and the
//! cable-type table.
//!
//! A [`ReferenceData`] value is immutable once built. Components that render
//! or classify records take it as a parameter; refreshing from the backend
//! builds a new value and replaces the old one wholesale.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Cable, CableKind, CableTypeId, ObjectKind};

/// A row of the backend's object-type reference table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectTypeRecord {
    /// Type tag, as stored on objects.
    pub name: String,
    /// Localized display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Marker glyph.
    #[serde(default)]
    pub emoji: Option<String>,
}

/// A row of the backend's cable-type reference table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CableTypeRecord {
    /// Identity.
    pub id: CableTypeId,
    /// Display name.
    pub name: String,
    /// Canonical fiber count of this type.
    #[serde(default)]
    pub fiber_count: Option<u32>,
    /// Display color, with or without a leading `#`.
    #[serde(default)]
    pub color: Option<String>,
    /// Free-text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// Resolved presentation of one object type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectTypeInfo {
    /// Display name.
    pub name: String,
    /// Marker glyph.
    pub emoji: String,
}

/// Immutable lookup tables for object and cable types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceData {
    object_types: BTreeMap<String, ObjectTypeInfo>,
    cable_types: Vec<CableTypeRecord>,
}

impl Default for ReferenceData {
    fn default() -> Self {
        use strum::IntoEnumIterator;
        let object_types = ObjectKind::iter()
            .map(|kind| {
                (
                    kind.to_string(),
                    ObjectTypeInfo {
                        name: kind.default_name().to_owned(),
                        emoji: kind.default_emoji().to_owned(),
                    },
                )
            })
            .collect();
        Self {
            object_types,
            cable_types: Vec::new(),
        }
    }
}

impl ReferenceData {
    /// Build from backend reference rows.
    ///
    /// Missing names or glyphs fall back to the built-in defaults for known
    /// kinds. An empty object-type list keeps the built-in table. Legacy tags
    /// are stored under their canonical kind.
    pub fn from_records(objects: &[ObjectTypeRecord], cables: Vec<CableTypeRecord>) -> Self {
        let mut data = Self {
            cable_types: cables,
            ..Self::default()
        };
        if objects.is_empty() {
            return data;
        }
        data.object_types.clear();
        for record in objects {
            let kind = ObjectKind::from_str(&record.name).ok();
            let key = kind.map_or_else(|| record.name.clone(), |k| k.to_string());
            let name = record
                .display_name
                .clone()
                .filter(|n| !n.is_empty())
                .or_else(|| kind.map(|k| k.default_name().to_owned()))
                .unwrap_or_else(|| record.name.clone());
            let emoji = record
                .emoji
                .clone()
                .filter(|e| !e.is_empty())
                .or_else(|| kind.map(|k| k.default_emoji().to_owned()))
                .unwrap_or_default();
            data.object_types
                .insert(key, ObjectTypeInfo { name, emoji });
        }
        data
    }

    /// Presentation for `kind`, falling back to the built-in defaults when the
    /// backend table does not list it.
    pub fn object_type(&self, kind: ObjectKind) -> ObjectTypeInfo {
        self.object_types
            .get(kind.to_string().as_str())
            .cloned()
            .unwrap_or_else(|| ObjectTypeInfo {
                name: kind.default_name().to_owned(),
                emoji: kind.default_emoji().to_owned(),
            })
    }

    /// Presentation for an arbitrary type tag, if known.
    pub fn object_type_by_name(&self, name: &str) -> Option<&ObjectTypeInfo> {
        self.object_types.get(name)
    }

    /// Every cable type, in backend order.
    pub fn cable_types(&self) -> &[CableTypeRecord] {
        &self.cable_types
    }

    /// The cable type with `id`.
    pub fn cable_type(&self, id: CableTypeId) -> Option<&CableTypeRecord> {
        self.cable_types.iter().find(|t| t.id == id)
    }

    /// The first cable type whose canonical fiber count is `fiber_count`.
    pub fn find_cable_type_by_fiber_count(&self, fiber_count: u32) -> Option<&CableTypeRecord> {
        self.cable_types
            .iter()
            .find(|t| t.fiber_count == Some(fiber_count))
    }

    /// Line color for `cable`.
    ///
    /// Precedence: the cable's stored color, then its cable type's color, then
    /// the optical fiber-count palette, then the per-kind color.
    pub fn cable_color(&self, cable: &Cable) -> String {
        let stored = cable.color.as_deref().filter(|c| !c.is_empty()).or_else(|| {
            cable
                .cable_type_id
                .and_then(|id| self.cable_type(id))
                .and_then(|t| t.color.as_deref())
                .filter(|c| !c.is_empty())
        });
        if let Some(color) = stored {
            return normalize_hex(color);
        }
        if cable.kind == CableKind::Optical {
            if let Some(color) = cable.fiber_count.and_then(fiber_count_color) {
                return color.to_owned();
            }
        }
        kind_color(cable.kind).to_owned()
    }
}

/// Palette entry for standard optical fiber counts.
pub fn fiber_count_color(fiber_count: u32) -> Option<&'static str> {
    Some(match fiber_count {
        2 => "#0000ff",
        4 => "#00bff3",
        6 => "#00736a",
        8 => "#00ff00",
        16 => "#91278f",
        24 => "#f16522",
        32 => "#827a00",
        48 => "#ff0000",
        64 => "#ff00ff",
        _ => return None,
    })
}

/// Generic color of a cable medium.
pub fn kind_color(kind: CableKind) -> &'static str {
    match kind {
        CableKind::Optical => "#4a9eff",
        CableKind::Copper => "#f59e0b",
    }
}

fn normalize_hex(color: &str) -> String {
    if color.starts_with('#') {
        color.to_owned()
    } else {
        format!("#{color}")
    }
}
