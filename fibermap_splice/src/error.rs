// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use fibermap_model::{CableId, FiberEnd, SpliceId};

/// Why a fiber index cannot be addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FiberFault {
    /// The cable is not in the current cable list.
    UnknownCable,
    /// The cable has no positive fiber count, or is not optical.
    NoFibers,
    /// The index is outside `0..count`.
    OutOfRange {
        /// The cable's fiber count.
        count: u32,
    },
}

impl fmt::Display for FiberFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCable => f.write_str("cable not found"),
            Self::NoFibers => f.write_str("cable has no fiber count, it may not be optical"),
            Self::OutOfRange { count } => {
                write!(f, "fiber numbers run from 0 to {}", count.saturating_sub(1))
            }
        }
    }
}

/// A rejected splice. Every variant is recoverable and carries a message
/// fit for an operator.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    /// Both sides name the same fiber.
    #[error("cannot splice {0} to itself")]
    SelfSpliceRejected(FiberEnd),
    /// One side does not address a real fiber.
    #[error("invalid fiber {fiber} on cable {cable}: {reason}")]
    InvalidFiber {
        /// The offending cable.
        cable: CableId,
        /// The requested index.
        fiber: i32,
        /// What is wrong with it.
        reason: FiberFault,
    },
    /// The cables do not meet at a common object.
    #[error("cables {from} and {to} are not connected, fibers can only be spliced where cables meet")]
    CablesNotConnected {
        /// Source cable.
        from: CableId,
        /// Target cable.
        to: CableId,
    },
    /// The exact same splice is already recorded.
    #[error("this connection already exists as splice {existing}")]
    DuplicateSplice {
        /// The existing record.
        existing: SpliceId,
    },
    /// The source fiber is already consumed.
    #[error("{end} is already used by splice {splice}")]
    FiberAlreadyUsed {
        /// The consumed fiber.
        end: FiberEnd,
        /// The splice consuming it.
        splice: SpliceId,
    },
}
