// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Client-side gate for new splices.

use fibermap_graph::CableGraph;
use fibermap_model::{FiberEnd, FiberSplice};

use crate::{FiberFault, SpliceError};

/// Check a proposed splice from `source` to `target` against the cable graph
/// and the existing `splices`.
///
/// Checks run in order and stop at the first failure:
///
/// 1. the two ends are not the same fiber,
/// 2. each end addresses a real fiber (source first),
/// 3. the cables share an endpoint,
/// 4. the exact splice is not already recorded,
/// 5. the source fiber is not used on either side of another splice.
///
/// Nothing is mutated; on `Ok` the caller persists the splice.
pub fn validate_splice(
    graph: &CableGraph,
    splices: &[FiberSplice],
    source: FiberEnd,
    target: FiberEnd,
) -> Result<(), SpliceError> {
    if source == target {
        return Err(SpliceError::SelfSpliceRejected(source));
    }

    check_fiber(graph, source)?;
    check_fiber(graph, target)?;

    if !graph.adjacent(source.cable, target.cable) {
        return Err(SpliceError::CablesNotConnected {
            from: source.cable,
            to: target.cable,
        });
    }

    if let Some(existing) = splices
        .iter()
        .find(|s| s.source() == source && s.target() == target)
    {
        return Err(SpliceError::DuplicateSplice {
            existing: existing.id,
        });
    }

    if let Some(conflict) = splices.iter().find(|s| s.uses(source)) {
        return Err(SpliceError::FiberAlreadyUsed {
            end: source,
            splice: conflict.id,
        });
    }

    Ok(())
}

/// Check that `end` addresses a real fiber of a known cable.
pub fn check_fiber(graph: &CableGraph, end: FiberEnd) -> Result<(), SpliceError> {
    let invalid = |reason| SpliceError::InvalidFiber {
        cable: end.cable,
        fiber: end.fiber,
        reason,
    };
    let entry = graph
        .cable(end.cable)
        .ok_or_else(|| invalid(FiberFault::UnknownCable))?;
    let count = entry
        .fiber_capacity
        .ok_or_else(|| invalid(FiberFault::NoFibers))?;
    if end.fiber < 0 || i64::from(end.fiber) >= i64::from(count) {
        return Err(invalid(FiberFault::OutOfRange { count }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_graph::build_adjacency;
    use fibermap_model::{Cable, CableId, CableKind, ObjectId, SpliceDraft, SpliceId};

    fn cable(id: i64, from: i64, to: i64, fibers: Option<u32>) -> Cable {
        Cable {
            id: CableId(id),
            name: format!("C{id}"),
            kind: CableKind::Optical,
            cable_type_id: None,
            color: None,
            from: ObjectId(from),
            to: ObjectId(to),
            fiber_count: fibers,
            distance_km: None,
            description: None,
        }
    }

    fn end(cable: i64, fiber: i32) -> FiberEnd {
        FiberEnd::new(CableId(cable), fiber)
    }

    fn splice(id: i64, source: FiberEnd, target: FiberEnd) -> FiberSplice {
        SpliceDraft::new(source, target).into_splice(SpliceId(id))
    }

    // A: 1-2, B: 2-3, C: 4-5
    fn graph() -> CableGraph {
        build_adjacency(&[
            cable(1, 1, 2, Some(8)),
            cable(2, 2, 3, Some(4)),
            cable(3, 4, 5, Some(8)),
        ])
    }

    #[test]
    fn identical_ends_are_rejected_first() {
        let g = graph();
        // Even an out-of-range or unknown fiber reports the self-splice.
        for (c, f) in [(1, 0), (1, 99), (9, -1)] {
            assert_eq!(
                validate_splice(&g, &[], end(c, f), end(c, f)),
                Err(SpliceError::SelfSpliceRejected(end(c, f)))
            );
        }
    }

    #[test]
    fn fiber_bounds_follow_fiber_count() {
        let g = graph();
        for i in 0..4 {
            assert_eq!(check_fiber(&g, end(2, i)), Ok(()));
        }
        for i in [-1, 4, 5, i32::MAX, i32::MIN] {
            assert_eq!(
                check_fiber(&g, end(2, i)),
                Err(SpliceError::InvalidFiber {
                    cable: CableId(2),
                    fiber: i,
                    reason: FiberFault::OutOfRange { count: 4 },
                }),
            );
        }
    }

    #[test]
    fn invalid_fiber_names_range_in_message() {
        let err = check_fiber(&graph(), end(2, 7)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid fiber 7 on cable 2: fiber numbers run from 0 to 3"
        );
    }

    #[test]
    fn cables_without_fibers_cannot_splice() {
        let mut copper = cable(5, 2, 6, Some(8));
        copper.kind = CableKind::Copper;
        let g = build_adjacency(&[cable(1, 1, 2, Some(8)), cable(4, 2, 7, None), copper]);
        let no_fibers = |c: i64| -> Result<(), SpliceError> {
            Err(SpliceError::InvalidFiber {
                cable: CableId(c),
                fiber: 0,
                reason: FiberFault::NoFibers,
            })
        };
        assert_eq!(validate_splice(&g, &[], end(1, 0), end(4, 0)), no_fibers(4));
        assert_eq!(validate_splice(&g, &[], end(5, 0), end(1, 0)), no_fibers(5));
        assert!(matches!(
            validate_splice(&g, &[], end(1, 0), end(8, 0)),
            Err(SpliceError::InvalidFiber {
                reason: FiberFault::UnknownCable,
                ..
            })
        ));
    }

    #[test]
    fn source_is_checked_before_target() {
        let g = graph();
        assert!(matches!(
            validate_splice(&g, &[], end(1, 50), end(2, 50)),
            Err(SpliceError::InvalidFiber { cable: CableId(1), .. })
        ));
    }

    #[test]
    fn adjacency_gate() {
        let g = graph();
        assert_eq!(validate_splice(&g, &[], end(1, 0), end(2, 0)), Ok(()));
        assert_eq!(
            validate_splice(&g, &[], end(1, 0), end(3, 0)),
            Err(SpliceError::CablesNotConnected {
                from: CableId(1),
                to: CableId(3),
            })
        );
    }

    #[test]
    fn duplicate_then_in_use() {
        let g = graph();
        let existing = [splice(10, end(1, 0), end(2, 0))];
        assert_eq!(
            validate_splice(&g, &existing, end(1, 0), end(2, 0)),
            Err(SpliceError::DuplicateSplice {
                existing: SpliceId(10)
            })
        );
        assert_eq!(
            validate_splice(&g, &existing, end(1, 0), end(2, 1)),
            Err(SpliceError::FiberAlreadyUsed {
                end: end(1, 0),
                splice: SpliceId(10),
            })
        );
        assert_eq!(validate_splice(&g, &existing, end(1, 1), end(2, 1)), Ok(()));
    }

    #[test]
    fn source_used_as_target_is_in_use() {
        let g = graph();
        let existing = [splice(11, end(2, 3), end(1, 5))];
        assert_eq!(
            validate_splice(&g, &existing, end(1, 5), end(2, 0)),
            Err(SpliceError::FiberAlreadyUsed {
                end: end(1, 5),
                splice: SpliceId(11),
            })
        );
    }

    #[test]
    fn fibers_of_one_cable_are_adjacent_to_themselves() {
        let g = graph();
        assert_eq!(validate_splice(&g, &[], end(1, 0), end(1, 1)), Ok(()));
    }
}
