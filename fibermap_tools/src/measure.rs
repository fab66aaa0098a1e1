// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance measurement along clicked points.

use fibermap_model::LatLng;

/// One leg of a measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// Start of the leg.
    pub from: LatLng,
    /// End of the leg.
    pub to: LatLng,
    /// Great-circle length of this leg, in kilometers.
    pub length_km: f64,
    /// Length from the first point through the end of this leg.
    pub cumulative_km: f64,
}

/// A polyline of measured points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    points: Vec<LatLng>,
}

impl Measurement {
    /// No points.
    pub fn new() -> Self {
        Self::default()
    }

    /// The measured points, in click order.
    pub fn points(&self) -> &[LatLng] {
        &self.points
    }

    /// Append a point.
    pub fn push(&mut self, point: LatLng) {
        self.points.push(point);
    }

    /// Discard all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Whether no point has been placed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Legs between consecutive points with running totals.
    pub fn segments(&self) -> Vec<Segment> {
        let mut total = 0.0;
        self.points
            .windows(2)
            .map(|pair| {
                let length_km = pair[0].haversine_km(&pair[1]);
                total += length_km;
                Segment {
                    from: pair[0],
                    to: pair[1],
                    length_km,
                    cumulative_km: total,
                }
            })
            .collect()
    }

    /// Total length in kilometers; zero with fewer than two points.
    pub fn total_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].haversine_km(&pair[1]))
            .sum()
    }
}
