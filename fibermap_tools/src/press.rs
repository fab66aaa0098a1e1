// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press tracking for drag gestures.
//!
//! A press remembers where the primary button went down, both on the globe
//! and on screen. Movement is measured in screen pixels so that the drag
//! tolerance feels the same at every zoom level.

use fibermap_model::LatLng;
use kurbo::Point;

/// An active primary-button press.
#[derive(Clone, Debug)]
pub(crate) struct Press {
    /// Where the press started.
    pub(crate) origin: LatLng,
    /// Screen position at press time.
    pub(crate) down_point: Point,
    /// True once the pointer travelled further than the drag tolerance.
    pub(crate) distance_exceeded: bool,
}

impl Press {
    pub(crate) fn new(origin: LatLng, down_point: Point) -> Self {
        Self {
            origin,
            down_point,
            distance_exceeded: false,
        }
    }

    /// Record pointer movement and return whether the press is now a drag.
    ///
    /// Once exceeded, the press stays a drag even if the pointer returns.
    pub(crate) fn on_move(&mut self, point: Point, tolerance: f64) -> bool {
        if !self.distance_exceeded && self.down_point.distance(point) > tolerance {
            self.distance_exceeded = true;
        }
        self.distance_exceeded
    }
}
