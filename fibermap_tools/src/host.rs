// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the tool state machine and the map widget.

use fibermap_model::{GeoBounds, LatLng};
use kurbo::Point;

use crate::ListenerSet;

/// Transient geometry drawn while a gesture is in progress.
#[derive(Clone, Debug, PartialEq)]
pub enum Preview {
    /// A rubber-band segment.
    Line {
        /// Fixed end.
        from: LatLng,
        /// End following the pointer.
        to: LatLng,
    },
    /// A rectangle being dragged out.
    Rectangle(GeoBounds),
    /// A circle being dragged out.
    Circle {
        /// Center.
        center: LatLng,
        /// Radius in meters.
        radius_m: f64,
    },
    /// An open path: a freehand stroke or unclosed polygon.
    Path(Vec<LatLng>),
}

/// Services the map widget provides to [`MapTools`](crate::MapTools).
///
/// Registration calls always come in matched pairs: every set passed to
/// [`register`](Self::register) is later passed to
/// [`unregister`](Self::unregister) exactly once.
pub trait ToolHost {
    /// Start delivering events of the kinds in `listeners`.
    fn register(&mut self, listeners: ListenerSet);

    /// Stop delivering events of the kinds in `listeners`.
    fn unregister(&mut self, listeners: ListenerSet);

    /// Enable or disable panning the map by dragging.
    fn set_panning(&mut self, enabled: bool);

    /// Replace the preview overlay.
    fn show_preview(&mut self, preview: Preview);

    /// Remove the preview overlay, if any.
    fn clear_preview(&mut self);

    /// Screen position of `position` in the current view, in pixels.
    fn project(&self, position: LatLng) -> Point;
}
