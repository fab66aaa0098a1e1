// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interactive fiber pairing: click-click and drag-and-drop.
//!
//! The schema view lets an operator pick two fibers to splice either by
//! clicking one fiber and then another, or by dragging from one fiber and
//! dropping on another. [`FiberPairing`] tracks the half-finished gesture and
//! reports a finished `(source, target)` pair; validation is left to
//! [`validate_splice`](crate::validate_splice).

use fibermap_model::FiberEnd;

/// Result of feeding a gesture step to [`FiberPairing`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingOutcome {
    /// The fiber is now the pending first half.
    Selected(FiberEnd),
    /// The pending selection was cleared by picking it again.
    Cancelled,
    /// Both fibers belong to the same cable; the selection was cleared.
    SameCable,
    /// Nothing to do (for example a drop with no drag in progress).
    Ignored,
    /// A complete pair, ready for validation.
    Paired {
        /// First fiber picked.
        source: FiberEnd,
        /// Second fiber picked.
        target: FiberEnd,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pending {
    Clicked(FiberEnd),
    Dragging(FiberEnd),
}

/// The half-finished pairing gesture, if any.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FiberPairing {
    pending: Option<Pending>,
}

impl FiberPairing {
    /// A pairing with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The fiber picked first, for rendering it as selected.
    pub fn pending(&self) -> Option<FiberEnd> {
        self.pending.map(|p| match p {
            Pending::Clicked(end) | Pending::Dragging(end) => end,
        })
    }

    /// Drop any half-finished gesture.
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// A click on fiber `end`.
    pub fn click(&mut self, end: FiberEnd) -> PairingOutcome {
        match self.pending.take() {
            None | Some(Pending::Dragging(_)) => {
                self.pending = Some(Pending::Clicked(end));
                PairingOutcome::Selected(end)
            }
            Some(Pending::Clicked(first)) => Self::complete(first, end),
        }
    }

    /// A drag starting on fiber `end`.
    pub fn drag_start(&mut self, end: FiberEnd) -> PairingOutcome {
        self.pending = Some(Pending::Dragging(end));
        PairingOutcome::Selected(end)
    }

    /// A drop onto fiber `end`.
    pub fn drop_on(&mut self, end: FiberEnd) -> PairingOutcome {
        match self.pending {
            Some(Pending::Dragging(first)) => {
                self.pending = None;
                Self::complete(first, end)
            }
            _ => PairingOutcome::Ignored,
        }
    }

    /// A drag released away from any fiber.
    pub fn drag_cancel(&mut self) {
        if matches!(self.pending, Some(Pending::Dragging(_))) {
            self.pending = None;
        }
    }

    fn complete(first: FiberEnd, second: FiberEnd) -> PairingOutcome {
        if first == second {
            PairingOutcome::Cancelled
        } else if first.cable == second.cable {
            PairingOutcome::SameCable
        } else {
            PairingOutcome::Paired {
                source: first,
                target: second,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_model::CableId;

    fn end(cable: i64, fiber: i32) -> FiberEnd {
        FiberEnd::new(CableId(cable), fiber)
    }

    #[test]
    fn click_click_pairs_across_cables() {
        let mut p = FiberPairing::new();
        assert_eq!(p.click(end(1, 0)), PairingOutcome::Selected(end(1, 0)));
        assert_eq!(p.pending(), Some(end(1, 0)));
        assert_eq!(
            p.click(end(2, 3)),
            PairingOutcome::Paired {
                source: end(1, 0),
                target: end(2, 3),
            }
        );
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn clicking_the_same_fiber_cancels() {
        let mut p = FiberPairing::new();
        p.click(end(1, 0));
        assert_eq!(p.click(end(1, 0)), PairingOutcome::Cancelled);
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn same_cable_is_rejected_and_resets() {
        let mut p = FiberPairing::new();
        p.click(end(1, 0));
        assert_eq!(p.click(end(1, 1)), PairingOutcome::SameCable);
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn drag_and_drop() {
        let mut p = FiberPairing::new();
        assert_eq!(p.drop_on(end(2, 0)), PairingOutcome::Ignored);
        p.drag_start(end(1, 2));
        assert_eq!(
            p.drop_on(end(2, 0)),
            PairingOutcome::Paired {
                source: end(1, 2),
                target: end(2, 0),
            }
        );
        p.drag_start(end(1, 2));
        p.drag_cancel();
        assert_eq!(p.pending(), None);
    }

    #[test]
    fn drag_cancel_keeps_click_selection() {
        let mut p = FiberPairing::new();
        p.click(end(1, 0));
        p.drag_cancel();
        assert_eq!(p.pending(), Some(end(1, 0)));
        p.reset();
        assert_eq!(p.pending(), None);
    }
}
