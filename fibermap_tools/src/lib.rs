// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fibermap Tools: the interactive map tool state machine.
//!
//! [`MapTools`] owns the active [`ToolMode`] and everything a gesture
//! accumulates: a pending cable start, a drag press, polygon vertices,
//! measurement points, the selection rectangle, and the annotation
//! [`Sketch`]. The map widget implements [`ToolHost`] and feeds
//! [`MapEvent`]s to [`MapTools::handle`]; anything the host must act on comes
//! back as a [`ToolEffect`].
//!
//! Listener management is declarative. Each mode, and each free-draw
//! [`DrawTool`], maps to a [`ListenerSet`]. A transition unregisters exactly
//! the held set and registers the new one, so handlers never leak across
//! modes. Events of a kind the mode does not hold are dropped by the
//! dispatcher.
//!
//! Keyboard shortcuts map to [`Command`]s through [`Command::for_key`]:
//! `M` measure, `S` select, `P` add point, `K` draw cable, `D` free draw,
//! `C` clear, and `Escape` cancel.
//!
//! # Example
//!
//! ```rust
//! use fibermap_model::{LatLng, ObjectId};
//! use fibermap_tools::{
//!     Command, ListenerSet, MapEvent, MapTools, PointerButton, Preview, ToolConfig, ToolEffect,
//!     ToolHost, ToolMode,
//! };
//! use kurbo::Point;
//!
//! #[derive(Default)]
//! struct Widget {
//!     listening: ListenerSet,
//! }
//!
//! impl ToolHost for Widget {
//!     fn register(&mut self, l: ListenerSet) { self.listening |= l; }
//!     fn unregister(&mut self, l: ListenerSet) { self.listening.remove(l); }
//!     fn set_panning(&mut self, _enabled: bool) {}
//!     fn show_preview(&mut self, _preview: Preview) {}
//!     fn clear_preview(&mut self) {}
//!     fn project(&self, p: LatLng) -> Point { Point::new(p.longitude, -p.latitude) }
//! }
//!
//! let mut tools = MapTools::new(Widget::default(), ToolConfig::default());
//! tools.apply(Command::DrawCable);
//! assert!(tools.host().listening.contains(ListenerSet::MARKER_DOWN));
//!
//! let press = |id| MapEvent::MarkerDown {
//!     object: ObjectId(id),
//!     position: LatLng::new(0.0, 0.0),
//!     button: PointerButton::Primary,
//! };
//! assert_eq!(tools.handle(press(4)), None);
//! assert_eq!(
//!     tools.handle(press(9)),
//!     Some(ToolEffect::CableDrawn { from: ObjectId(4), to: ObjectId(9) })
//! );
//! assert_eq!(tools.mode(), ToolMode::Idle);
//! assert!(tools.host().listening.is_empty());
//! ```

mod config;
mod host;
mod input;
mod machine;
mod measure;
mod press;
mod shapes;

pub use config::ToolConfig;
pub use host::{Preview, ToolHost};
pub use input::{Command, Key, ListenerSet, MapEvent, PointerButton};
pub use machine::{DrawTool, MapTools, ToolEffect, ToolMode};
pub use measure::{Measurement, Segment};
pub use shapes::{Shape, Sketch};
