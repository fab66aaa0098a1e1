// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The splice list for the selected cable.

use fibermap_graph::CableGraph;
use fibermap_model::{CableId, FiberEnd, FiberSplice, SpliceDraft, SpliceId};

use crate::{SpliceError, validate_splice};

/// How a fiber slot should render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Not part of any splice.
    Free,
    /// Consumed by the given splice.
    Connected(SpliceId),
    /// Picked as the first half of a pairing in progress.
    SelectedPending,
}

/// Splices visible from one cable.
///
/// The backend is queried per cable, so the store only ever holds the records
/// of its current scope. Records arriving for a different cable than the one
/// in scope are stale and ignored.
#[derive(Clone, Debug, Default)]
pub struct SpliceStore {
    scope: Option<CableId>,
    splices: Vec<FiberSplice>,
}

impl SpliceStore {
    /// An empty store with nothing in scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cable whose splices are held.
    pub fn scope(&self) -> Option<CableId> {
        self.scope
    }

    /// Switch scope to `cable` and drop the records of the previous scope.
    pub fn focus(&mut self, cable: Option<CableId>) {
        if self.scope != cable {
            self.scope = cable;
            self.splices.clear();
        }
    }

    /// Install a fetched list for `cable`.
    ///
    /// Returns `false` and changes nothing when `cable` is no longer in scope.
    pub fn replace(&mut self, cable: CableId, records: Vec<FiberSplice>) -> bool {
        if self.scope != Some(cable) {
            return false;
        }
        self.splices = records;
        true
    }

    /// Every held record.
    pub fn all(&self) -> &[FiberSplice] {
        &self.splices
    }

    /// Records with either side on `cable`.
    pub fn list(&self, cable: CableId) -> impl Iterator<Item = &FiberSplice> + '_ {
        self.splices.iter().filter(move |s| s.touches_cable(cable))
    }

    /// Number of records with either side on `cable`.
    pub fn count_for(&self, cable: CableId) -> usize {
        self.list(cable).count()
    }

    /// Run the splice validator against the held records.
    pub fn check(&self, graph: &CableGraph, draft: &SpliceDraft) -> Result<(), SpliceError> {
        validate_splice(graph, &self.splices, draft.source(), draft.target())
    }

    /// Add a persisted record.
    ///
    /// Returns `false` when the record does not touch the cable in scope; it
    /// is then not visible from here and is dropped. A record with an id
    /// already held replaces the old one.
    pub fn insert(&mut self, splice: FiberSplice) -> bool {
        let Some(scope) = self.scope else {
            return false;
        };
        if !splice.touches_cable(scope) {
            return false;
        }
        match self.splices.iter_mut().find(|s| s.id == splice.id) {
            Some(slot) => *slot = splice,
            None => self.splices.push(splice),
        }
        true
    }

    /// Remove the record with `id`, returning it.
    pub fn delete(&mut self, id: SpliceId) -> Option<FiberSplice> {
        let pos = self.splices.iter().position(|s| s.id == id)?;
        Some(self.splices.remove(pos))
    }

    /// The splice using fiber `fiber` of `cable` as its source or its target.
    pub fn find_by_source_or_target(&self, cable: CableId, fiber: i32) -> Option<&FiberSplice> {
        let end = FiberEnd::new(cable, fiber);
        self.splices.iter().find(|s| s.uses(end))
    }

    /// Render state of `end`, given the end picked so far in a pairing.
    pub fn slot_state(&self, end: FiberEnd, pending: Option<FiberEnd>) -> SlotState {
        if pending == Some(end) {
            return SlotState::SelectedPending;
        }
        match self.find_by_source_or_target(end.cable, end.fiber) {
            Some(s) => SlotState::Connected(s.id),
            None => SlotState::Free,
        }
    }
}
