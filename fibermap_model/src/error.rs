// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::{MAX_FIBER_COUNT, MAX_NAME_LENGTH, MIN_FIBER_COUNT};

/// A create or edit form that cannot be submitted.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DraftError {
    /// The name is empty after trimming.
    #[error("name is required")]
    MissingName,
    /// The name exceeds the stored column width.
    #[error("name must be at most {max} characters, got {0}", max = MAX_NAME_LENGTH)]
    NameTooLong(usize),
    /// Latitude or longitude is outside the WGS84 range.
    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates {
        /// Submitted latitude.
        latitude: f64,
        /// Submitted longitude.
        longitude: f64,
    },
    /// Fiber count outside the accepted range.
    #[error(
        "fiber count must be between {min} and {max}, got {0}",
        min = MIN_FIBER_COUNT,
        max = MAX_FIBER_COUNT
    )]
    InvalidFiberCount(u32),
    /// Negative or non-finite distance.
    #[error("distance must be a non-negative number of kilometers, got {0}")]
    InvalidDistance(f64),
    /// A cable form without both endpoints.
    #[error("cable needs both a start and an end object")]
    MissingEndpoint,
    /// A cable form whose endpoints are the same object.
    #[error("cable cannot start and end at the same object")]
    LoopCable,
}
