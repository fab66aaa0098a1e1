// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Free-drawn annotation shapes.

use fibermap_model::{GeoBounds, LatLng};

/// One committed annotation.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// A straight segment.
    Line {
        /// First end.
        from: LatLng,
        /// Second end.
        to: LatLng,
    },
    /// An axis-aligned rectangle.
    Rectangle(GeoBounds),
    /// A circle with a radius in meters.
    Circle {
        /// Center.
        center: LatLng,
        /// Radius in meters.
        radius_m: f64,
    },
    /// A freehand stroke of at least two points.
    Freehand(Vec<LatLng>),
    /// A closed polygon of at least three vertices.
    Polygon(Vec<LatLng>),
}

impl Shape {
    /// Bounds used for erasing, or `None` for a shape without points.
    pub fn bounds(&self) -> Option<GeoBounds> {
        match self {
            Self::Line { from, to } => Some(GeoBounds::from_corners(*from, *to)),
            Self::Rectangle(bounds) => Some(*bounds),
            Self::Circle { center, radius_m } => Some(GeoBounds::around_circle(*center, *radius_m)),
            Self::Freehand(points) | Self::Polygon(points) => GeoBounds::from_points(points),
        }
    }
}

/// Committed shapes in drawing order; later shapes are on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sketch {
    shapes: Vec<Shape>,
}

impl Sketch {
    /// An empty sketch.
    pub fn new() -> Self {
        Self::default()
    }

    /// All shapes, bottom first.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether nothing has been drawn.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Add `shape` on top and return its index.
    pub fn push(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    /// Remove the shape at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Shape> {
        (index < self.shapes.len()).then(|| self.shapes.remove(index))
    }

    /// Remove the topmost shape whose bounds contain `position`.
    pub fn erase_at(&mut self, position: &LatLng) -> Option<Shape> {
        let index = self
            .shapes
            .iter()
            .rposition(|s| s.bounds().is_some_and(|b| b.contains(position)))?;
        Some(self.shapes.remove(index))
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}
