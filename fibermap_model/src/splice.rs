// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fiber splice records.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{CableId, SpliceId};

/// One fiber of one cable, addressed by zero-based index.
///
/// The index is signed so that out-of-range input coming from forms can be
/// represented and rejected rather than silently wrapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberEnd {
    /// Owning cable.
    pub cable: CableId,
    /// Zero-based fiber index.
    pub fiber: i32,
}

impl FiberEnd {
    /// Address `fiber` of `cable`.
    pub const fn new(cable: CableId, fiber: i32) -> Self {
        Self { cable, fiber }
    }
}

impl fmt::Display for FiberEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cable {} fiber {}", self.cable, self.fiber)
    }
}

/// A persisted splice between two fibers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiberSplice {
    /// Server-assigned identity.
    #[serde(alias = "fiber_splices_id")]
    pub id: SpliceId,
    /// Cable owning the source fiber.
    pub cable_id: CableId,
    /// Source fiber index.
    pub fiber_number: i32,
    /// Cable owning the target fiber.
    pub splice_to_cable_id: CableId,
    /// Target fiber index.
    pub splice_to_fiber: i32,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl FiberSplice {
    /// The source side.
    pub fn source(&self) -> FiberEnd {
        FiberEnd::new(self.cable_id, self.fiber_number)
    }

    /// The target side.
    pub fn target(&self) -> FiberEnd {
        FiberEnd::new(self.splice_to_cable_id, self.splice_to_fiber)
    }

    /// Whether `end` is either side of this splice.
    pub fn uses(&self, end: FiberEnd) -> bool {
        self.source() == end || self.target() == end
    }

    /// Whether either side belongs to `cable`.
    pub fn touches_cable(&self, cable: CableId) -> bool {
        self.cable_id == cable || self.splice_to_cable_id == cable
    }
}

/// The payload for creating a splice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpliceDraft {
    /// Cable owning the source fiber.
    pub cable_id: CableId,
    /// Source fiber index.
    pub fiber_number: i32,
    /// Cable owning the target fiber.
    pub splice_to_cable_id: CableId,
    /// Target fiber index.
    pub splice_to_fiber: i32,
    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SpliceDraft {
    /// A draft joining `source` to `target`.
    pub fn new(source: FiberEnd, target: FiberEnd) -> Self {
        Self {
            cable_id: source.cable,
            fiber_number: source.fiber,
            splice_to_cable_id: target.cable,
            splice_to_fiber: target.fiber,
            notes: None,
        }
    }

    /// Attach notes; blank text is dropped.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    /// The source side.
    pub fn source(&self) -> FiberEnd {
        FiberEnd::new(self.cable_id, self.fiber_number)
    }

    /// The target side.
    pub fn target(&self) -> FiberEnd {
        FiberEnd::new(self.splice_to_cable_id, self.splice_to_fiber)
    }

    /// Attach the server-assigned id.
    pub fn into_splice(self, id: SpliceId) -> FiberSplice {
        FiberSplice {
            id,
            cable_id: self.cable_id,
            fiber_number: self.fiber_number,
            splice_to_cable_id: self.splice_to_cable_id,
            splice_to_fiber: self.splice_to_fiber,
            notes: self.notes,
        }
    }
}
