// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable tolerances of the map tools.

use serde::{Deserialize, Serialize};

/// Pixel and distance tolerances used by [`MapTools`](crate::MapTools).
///
/// Every field has a default, so a configuration file may name only the
/// values it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// A polygon closes when a click lands within this many pixels of its
    /// first vertex.
    pub polygon_close_px: f64,
    /// Smallest radius a drawn circle may have, in meters.
    pub min_circle_radius_m: f64,
    /// Pointer travel, in pixels, after which a press counts as a drag.
    pub drag_tolerance_px: f64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            polygon_close_px: 14.0,
            min_circle_radius_m: 10.0,
            drag_tolerance_px: 2.0,
        }
    }
}
