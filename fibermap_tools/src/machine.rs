// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tool mode state machine.

use core::fmt;
use core::mem;

use fibermap_model::{COORDINATE_DECIMALS, GeoBounds, LatLng, NetworkObject, ObjectId};

use crate::press::Press;
use crate::{
    Command, Key, ListenerSet, MapEvent, Measurement, PointerButton, Preview, Shape, Sketch,
    ToolConfig, ToolHost,
};

/// Sub-tools of free drawing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum DrawTool {
    /// Pan the map; draws nothing.
    #[default]
    Hand,
    /// Drag out a straight line.
    Line,
    /// Drag out a rectangle.
    Rectangle,
    /// Drag out a circle from its center.
    Circle,
    /// Drag a freehand stroke.
    Freehand,
    /// Click vertices, then close.
    Polygon,
    /// Click a shape to remove it.
    Eraser,
}

impl DrawTool {
    /// Listener kinds this tool needs. The pan key is always watched.
    pub fn listeners(self) -> ListenerSet {
        let keys = ListenerSet::KEY_DOWN | ListenerSet::KEY_UP;
        keys | match self {
            Self::Hand => ListenerSet::empty(),
            Self::Line | Self::Rectangle | Self::Circle | Self::Freehand => {
                ListenerSet::POINTER_DOWN | ListenerSet::POINTER_MOVE | ListenerSet::POINTER_UP
            }
            Self::Polygon => {
                ListenerSet::CLICK | ListenerSet::POINTER_MOVE | ListenerSet::CONTEXT_MENU
            }
            Self::Eraser => ListenerSet::CLICK,
        }
    }

    fn is_drag(self) -> bool {
        matches!(
            self,
            Self::Line | Self::Rectangle | Self::Circle | Self::Freehand
        )
    }
}

/// The active map tool. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ToolMode {
    /// No tool; the map pans.
    #[default]
    Idle,
    /// Clicks append measurement points.
    Measuring,
    /// Dragging sets the selection rectangle.
    SelectingRectangle,
    /// The next click places a new object.
    AddingPoint,
    /// The next click fills a coordinate field.
    PickingCoordinate,
    /// Two marker presses connect two objects with a cable.
    DrawingCable,
    /// Annotation drawing with the given sub-tool.
    FreeDrawing(DrawTool),
}

impl ToolMode {
    /// Listener kinds held while this mode is active.
    pub fn listeners(self) -> ListenerSet {
        match self {
            Self::Idle => ListenerSet::empty(),
            Self::Measuring | Self::AddingPoint | Self::PickingCoordinate => ListenerSet::CLICK,
            Self::SelectingRectangle => {
                ListenerSet::POINTER_DOWN | ListenerSet::POINTER_MOVE | ListenerSet::POINTER_UP
            }
            Self::DrawingCable => {
                ListenerSet::MARKER_DOWN
                    | ListenerSet::POINTER_DOWN
                    | ListenerSet::POINTER_MOVE
                    | ListenerSet::POINTER_UP
                    | ListenerSet::CONTEXT_MENU
            }
            Self::FreeDrawing(tool) => tool.listeners(),
        }
    }

    /// Whether dragging pans the map in this mode.
    pub fn pans(self, pan_key_held: bool) -> bool {
        match self {
            Self::Idle | Self::Measuring => true,
            Self::SelectingRectangle
            | Self::AddingPoint
            | Self::PickingCoordinate
            | Self::DrawingCable => false,
            Self::FreeDrawing(tool) => tool == DrawTool::Hand || pan_key_held,
        }
    }

    fn is_cancellable(self) -> bool {
        matches!(
            self,
            Self::DrawingCable | Self::AddingPoint | Self::PickingCoordinate
        )
    }
}

/// Something the host must act on after an event.
#[derive(Clone, Debug, PartialEq)]
pub enum ToolEffect {
    /// The operator connected two objects; open the cable form.
    CableDrawn {
        /// First pressed object.
        from: ObjectId,
        /// Second pressed object.
        to: ObjectId,
    },
    /// A new object should be created here. Rounded to six decimals.
    PointPlaced(LatLng),
    /// A coordinate field should receive this position. Rounded to six
    /// decimals.
    CoordinatePicked(LatLng),
    /// The selection rectangle was dragged out.
    SelectionChanged(GeoBounds),
    /// A shape was committed at this index of the sketch.
    ShapeAdded(usize),
    /// The eraser removed this shape.
    ShapeErased(Shape),
}

#[derive(Clone, Copy, Debug)]
struct CableStart {
    object: ObjectId,
    position: LatLng,
}

/// Interactive map tools driving a [`ToolHost`].
///
/// Every mode change goes through one transition that releases the held
/// listener set, discards any gesture in progress, registers the new mode's
/// set, and updates map panning. Events are dispatched through
/// [`handle`](Self::handle), which drops kinds the current mode does not
/// hold.
///
/// The held set is released by [`teardown`](Self::teardown) or on drop.
pub struct MapTools<H: ToolHost> {
    host: H,
    config: ToolConfig,
    mode: ToolMode,
    held: ListenerSet,
    pan_key_held: bool,
    cable_start: Option<CableStart>,
    press: Option<Press>,
    stroke: Vec<LatLng>,
    vertices: Vec<LatLng>,
    measurement: Measurement,
    selection: Option<GeoBounds>,
    sketch: Sketch,
}

impl<H: ToolHost> fmt::Debug for MapTools<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapTools")
            .field("mode", &self.mode)
            .field("held", &self.held)
            .field("pan_key_held", &self.pan_key_held)
            .field("cable_start", &self.cable_start.map(|s| s.object))
            .field("measure_points", &self.measurement.points().len())
            .field("shapes", &self.sketch.len())
            .finish_non_exhaustive()
    }
}

impl<H: ToolHost> MapTools<H> {
    /// Start idle on `host`.
    pub fn new(mut host: H, config: ToolConfig) -> Self {
        host.set_panning(true);
        Self {
            host,
            config,
            mode: ToolMode::Idle,
            held: ListenerSet::empty(),
            pan_key_held: false,
            cable_start: None,
            press: None,
            stroke: Vec::new(),
            vertices: Vec::new(),
            measurement: Measurement::new(),
            selection: None,
            sketch: Sketch::new(),
        }
    }

    /// The active mode.
    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Listener kinds currently registered with the host.
    pub fn held(&self) -> ListenerSet {
        self.held
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The tolerances in use.
    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// The object a cable being drawn starts from.
    pub fn cable_start(&self) -> Option<ObjectId> {
        self.cable_start.map(|s| s.object)
    }

    /// Whether the pan key is held during free drawing.
    pub fn is_pan_key_held(&self) -> bool {
        self.pan_key_held
    }

    /// Points placed while measuring.
    pub fn measurement(&self) -> &Measurement {
        &self.measurement
    }

    /// The last dragged selection rectangle.
    pub fn selection(&self) -> Option<GeoBounds> {
        self.selection
    }

    /// Objects inside the selection rectangle, edges included.
    pub fn objects_in_selection<'a>(&self, objects: &'a [NetworkObject]) -> Vec<&'a NetworkObject> {
        let Some(bounds) = self.selection else {
            return Vec::new();
        };
        objects
            .iter()
            .filter(|o| bounds.contains(&o.position))
            .collect()
    }

    /// Committed annotation shapes.
    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    /// Remove the shape at `index`.
    pub fn remove_shape(&mut self, index: usize) -> Option<Shape> {
        self.sketch.remove(index)
    }

    /// Remove every shape and any stroke in progress.
    pub fn clear_shapes(&mut self) {
        self.sketch.clear();
        self.abort_gesture();
    }

    /// Switch to `mode`, even when it is already active.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.transition(mode);
    }

    /// Switch free drawing to `tool`.
    pub fn select_tool(&mut self, tool: DrawTool) {
        self.transition(ToolMode::FreeDrawing(tool));
    }

    /// Run an operator command. Returns whether anything changed.
    pub fn apply(&mut self, command: Command) -> bool {
        tracing::debug!(%command, mode = ?self.mode, "tool command");
        let current = self.mode;
        let toggle = |target: ToolMode| {
            if current == target {
                ToolMode::Idle
            } else {
                target
            }
        };
        let next = match command {
            Command::Measure => toggle(ToolMode::Measuring),
            Command::Select => toggle(ToolMode::SelectingRectangle),
            Command::AddPoint => toggle(ToolMode::AddingPoint),
            Command::DrawCable => toggle(ToolMode::DrawingCable),
            Command::PickCoordinate => toggle(ToolMode::PickingCoordinate),
            Command::FreeDraw => match current {
                ToolMode::FreeDrawing(_) => ToolMode::Idle,
                _ => ToolMode::FreeDrawing(DrawTool::Hand),
            },
            Command::Clear => {
                let changed = !self.measurement.is_empty() || self.selection.is_some();
                self.measurement.clear();
                self.selection = None;
                return changed;
            }
            Command::Cancel => {
                if !current.is_cancellable() {
                    return false;
                }
                ToolMode::Idle
            }
        };
        self.transition(next);
        true
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: MapEvent) -> Option<ToolEffect> {
        if !self.held.contains(event.listener()) {
            tracing::trace!(?event, mode = ?self.mode, "event without listener dropped");
            return None;
        }
        match self.mode {
            ToolMode::Idle => None,
            ToolMode::Measuring => {
                if let MapEvent::Click { position } = event {
                    self.measurement.push(position);
                }
                None
            }
            ToolMode::SelectingRectangle => self.on_select(event),
            ToolMode::AddingPoint | ToolMode::PickingCoordinate => self.on_place(event),
            ToolMode::DrawingCable => self.on_cable(event),
            ToolMode::FreeDrawing(tool) => self.on_draw(tool, event),
        }
    }

    /// Release the held listeners and return to idle.
    ///
    /// Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.held.is_empty() && self.mode == ToolMode::Idle {
            return;
        }
        self.transition(ToolMode::Idle);
    }

    fn transition(&mut self, next: ToolMode) {
        tracing::debug!(from = ?self.mode, to = ?next, "tool mode change");
        if !self.held.is_empty() {
            self.host.unregister(self.held);
            self.held = ListenerSet::empty();
        }
        self.abort_gesture();
        self.cable_start = None;
        self.vertices.clear();
        if !matches!(next, ToolMode::FreeDrawing(_)) {
            self.pan_key_held = false;
        }
        self.mode = next;
        let wanted = next.listeners();
        if !wanted.is_empty() {
            self.host.register(wanted);
            self.held = wanted;
        }
        self.host.set_panning(next.pans(self.pan_key_held));
    }

    fn abort_gesture(&mut self) {
        self.press = None;
        self.stroke.clear();
        self.host.clear_preview();
    }

    fn begin_press(&mut self, position: LatLng) {
        let point = self.host.project(position);
        self.press = Some(Press::new(position, point));
    }

    /// Feed movement to the active press; the press origin once it is a drag.
    fn drag_to(&mut self, position: LatLng) -> Option<LatLng> {
        let point = self.host.project(position);
        let tolerance = self.config.drag_tolerance_px;
        let press = self.press.as_mut()?;
        press
            .on_move(point, tolerance)
            .then_some(press.origin)
    }

    fn on_select(&mut self, event: MapEvent) -> Option<ToolEffect> {
        match event {
            MapEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            } => {
                self.begin_press(position);
                None
            }
            MapEvent::PointerMove { position } => {
                let origin = self.drag_to(position)?;
                let bounds = GeoBounds::from_corners(origin, position);
                self.selection = Some(bounds);
                self.host.show_preview(Preview::Rectangle(bounds));
                None
            }
            MapEvent::PointerUp { position, .. } => {
                let press = self.press.take()?;
                self.host.clear_preview();
                if !press.distance_exceeded {
                    return None;
                }
                let bounds = GeoBounds::from_corners(press.origin, position);
                self.selection = Some(bounds);
                Some(ToolEffect::SelectionChanged(bounds))
            }
            _ => None,
        }
    }

    fn on_place(&mut self, event: MapEvent) -> Option<ToolEffect> {
        let MapEvent::Click { position } = event else {
            return None;
        };
        let position = position.rounded(COORDINATE_DECIMALS);
        let effect = if self.mode == ToolMode::AddingPoint {
            ToolEffect::PointPlaced(position)
        } else {
            ToolEffect::CoordinatePicked(position)
        };
        self.transition(ToolMode::Idle);
        Some(effect)
    }

    fn on_cable(&mut self, event: MapEvent) -> Option<ToolEffect> {
        match event {
            MapEvent::MarkerDown {
                object,
                position,
                button: PointerButton::Primary,
            } => match self.cable_start {
                None => {
                    tracing::debug!(%object, "cable start");
                    self.cable_start = Some(CableStart { object, position });
                    None
                }
                Some(start) if start.object == object => {
                    self.drop_cable_start();
                    None
                }
                Some(start) => {
                    tracing::debug!(from = %start.object, to = %object, "cable drawn");
                    self.transition(ToolMode::Idle);
                    Some(ToolEffect::CableDrawn {
                        from: start.object,
                        to: object,
                    })
                }
            },
            MapEvent::MarkerDown {
                button: PointerButton::Secondary,
                ..
            }
            | MapEvent::PointerDown {
                button: PointerButton::Secondary,
                ..
            }
            | MapEvent::ContextMenu { .. } => {
                self.drop_cable_start();
                None
            }
            MapEvent::PointerMove { position } => {
                if let Some(start) = self.cable_start {
                    self.host.show_preview(Preview::Line {
                        from: start.position,
                        to: position,
                    });
                }
                None
            }
            MapEvent::PointerUp {
                over_marker: false,
                ..
            } => {
                if self.cable_start.is_some() {
                    self.host.clear_preview();
                }
                None
            }
            _ => None,
        }
    }

    fn drop_cable_start(&mut self) {
        if self.cable_start.take().is_some() {
            tracing::debug!("cable start cancelled");
            self.host.clear_preview();
        }
    }

    fn on_draw(&mut self, tool: DrawTool, event: MapEvent) -> Option<ToolEffect> {
        match event {
            MapEvent::KeyDown(Key::Space) => {
                self.hold_pan_key();
                return None;
            }
            MapEvent::KeyUp(Key::Space) => {
                self.release_pan_key();
                return None;
            }
            _ => {}
        }
        if self.pan_key_held {
            return None;
        }
        match tool {
            DrawTool::Hand => None,
            DrawTool::Polygon => self.on_polygon(event),
            DrawTool::Eraser => match event {
                MapEvent::Click { position } => {
                    self.sketch.erase_at(&position).map(ToolEffect::ShapeErased)
                }
                _ => None,
            },
            _ => self.on_drag_tool(tool, event),
        }
    }

    fn hold_pan_key(&mut self) {
        if self.pan_key_held {
            return;
        }
        self.pan_key_held = true;
        if self.press.is_some() {
            self.abort_gesture();
        }
        self.host.set_panning(true);
    }

    fn release_pan_key(&mut self) {
        if !self.pan_key_held {
            return;
        }
        self.pan_key_held = false;
        self.host.set_panning(self.mode.pans(false));
    }

    fn on_drag_tool(&mut self, tool: DrawTool, event: MapEvent) -> Option<ToolEffect> {
        debug_assert!(tool.is_drag(), "not a drag tool: {tool}");
        match event {
            MapEvent::PointerDown {
                position,
                button: PointerButton::Primary,
            } => {
                self.begin_press(position);
                self.stroke.clear();
                self.stroke.push(position);
                None
            }
            MapEvent::PointerMove { position } => {
                let origin = self.drag_to(position)?;
                let preview = match tool {
                    DrawTool::Line => Preview::Line {
                        from: origin,
                        to: position,
                    },
                    DrawTool::Rectangle => {
                        Preview::Rectangle(GeoBounds::from_corners(origin, position))
                    }
                    DrawTool::Circle => Preview::Circle {
                        center: origin,
                        radius_m: self.circle_radius(origin, position),
                    },
                    _ => {
                        self.stroke.push(position);
                        Preview::Path(self.stroke.clone())
                    }
                };
                self.host.show_preview(preview);
                None
            }
            MapEvent::PointerUp { position, .. } => {
                let press = self.press.take()?;
                let mut stroke = mem::take(&mut self.stroke);
                self.host.clear_preview();
                if !press.distance_exceeded {
                    return None;
                }
                let origin = press.origin;
                let shape = match tool {
                    DrawTool::Line => Shape::Line {
                        from: origin,
                        to: position,
                    },
                    DrawTool::Rectangle => Shape::Rectangle(GeoBounds::from_corners(origin, position)),
                    DrawTool::Circle => Shape::Circle {
                        center: origin,
                        radius_m: self.circle_radius(origin, position),
                    },
                    _ => {
                        if stroke.last() != Some(&position) {
                            stroke.push(position);
                        }
                        if stroke.len() < 2 {
                            return None;
                        }
                        Shape::Freehand(stroke)
                    }
                };
                Some(ToolEffect::ShapeAdded(self.sketch.push(shape)))
            }
            _ => None,
        }
    }

    fn circle_radius(&self, center: LatLng, edge: LatLng) -> f64 {
        (center.haversine_km(&edge) * 1000.0).max(self.config.min_circle_radius_m)
    }

    fn on_polygon(&mut self, event: MapEvent) -> Option<ToolEffect> {
        match event {
            MapEvent::Click { position } => {
                if let Some(first) = self.vertices.first().filter(|_| self.vertices.len() >= 3) {
                    let gap = self.host.project(*first).distance(self.host.project(position));
                    if gap <= self.config.polygon_close_px {
                        return self.close_polygon();
                    }
                }
                self.vertices.push(position);
                self.host.show_preview(Preview::Path(self.vertices.clone()));
                None
            }
            MapEvent::PointerMove { position } if !self.vertices.is_empty() => {
                let mut path = self.vertices.clone();
                path.push(position);
                self.host.show_preview(Preview::Path(path));
                None
            }
            MapEvent::KeyDown(Key::Enter) | MapEvent::ContextMenu { .. } => self.close_polygon(),
            _ => None,
        }
    }

    /// Commit the polygon; fewer than three vertices keeps collecting.
    fn close_polygon(&mut self) -> Option<ToolEffect> {
        if self.vertices.len() < 3 {
            return None;
        }
        let vertices = mem::take(&mut self.vertices);
        self.host.clear_preview();
        Some(ToolEffect::ShapeAdded(
            self.sketch.push(Shape::Polygon(vertices)),
        ))
    }
}

impl<H: ToolHost> Drop for MapTools<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_model::ObjectKind;
    use kurbo::Point;
    use std::cell::{Ref, RefCell};
    use std::rc::Rc;
    use strum::IntoEnumIterator;

    #[derive(Debug)]
    struct HostState {
        registered: ListenerSet,
        registrations: usize,
        unregistrations: usize,
        panning: bool,
        preview: Option<Preview>,
        /// Pixels per degree.
        scale: f64,
    }

    #[derive(Clone, Debug)]
    struct RecordingHost(Rc<RefCell<HostState>>);

    impl RecordingHost {
        fn new(scale: f64) -> Self {
            Self(Rc::new(RefCell::new(HostState {
                registered: ListenerSet::empty(),
                registrations: 0,
                unregistrations: 0,
                panning: false,
                preview: None,
                scale,
            })))
        }

        fn state(&self) -> Ref<'_, HostState> {
            self.0.borrow()
        }
    }

    impl ToolHost for RecordingHost {
        fn register(&mut self, listeners: ListenerSet) {
            let mut s = self.0.borrow_mut();
            assert!(!s.registered.intersects(listeners), "double registration");
            s.registered |= listeners;
            s.registrations += 1;
        }

        fn unregister(&mut self, listeners: ListenerSet) {
            let mut s = self.0.borrow_mut();
            assert!(s.registered.contains(listeners), "releasing unheld listeners");
            s.registered.remove(listeners);
            s.unregistrations += 1;
        }

        fn set_panning(&mut self, enabled: bool) {
            self.0.borrow_mut().panning = enabled;
        }

        fn show_preview(&mut self, preview: Preview) {
            self.0.borrow_mut().preview = Some(preview);
        }

        fn clear_preview(&mut self) {
            self.0.borrow_mut().preview = None;
        }

        fn project(&self, position: LatLng) -> Point {
            let scale = self.0.borrow().scale;
            Point::new(position.longitude * scale, -position.latitude * scale)
        }
    }

    fn tools() -> (MapTools<RecordingHost>, RecordingHost) {
        tools_at_scale(1000.0)
    }

    fn tools_at_scale(scale: f64) -> (MapTools<RecordingHost>, RecordingHost) {
        let host = RecordingHost::new(scale);
        (MapTools::new(host.clone(), ToolConfig::default()), host)
    }

    fn marker(id: i64, button: PointerButton) -> MapEvent {
        MapEvent::MarkerDown {
            object: ObjectId(id),
            position: LatLng::new(id as f64, 0.0),
            button,
        }
    }

    fn click(lat: f64, lon: f64) -> MapEvent {
        MapEvent::Click {
            position: LatLng::new(lat, lon),
        }
    }

    fn down(lat: f64, lon: f64) -> MapEvent {
        MapEvent::PointerDown {
            position: LatLng::new(lat, lon),
            button: PointerButton::Primary,
        }
    }

    fn mv(lat: f64, lon: f64) -> MapEvent {
        MapEvent::PointerMove {
            position: LatLng::new(lat, lon),
        }
    }

    fn up(lat: f64, lon: f64) -> MapEvent {
        MapEvent::PointerUp {
            position: LatLng::new(lat, lon),
            over_marker: false,
        }
    }

    #[test]
    fn two_markers_draw_a_cable_and_exit() {
        let (mut t, host) = tools();
        assert!(t.apply(Command::DrawCable));
        assert!(!host.state().panning);

        assert_eq!(t.handle(marker(1, PointerButton::Primary)), None);
        assert_eq!(t.cable_start(), Some(ObjectId(1)));
        let effect = t.handle(marker(2, PointerButton::Primary));
        assert_eq!(
            effect,
            Some(ToolEffect::CableDrawn {
                from: ObjectId(1),
                to: ObjectId(2),
            })
        );
        assert_eq!(t.mode(), ToolMode::Idle);
        assert_eq!(t.cable_start(), None);
        assert!(host.state().registered.is_empty());
        assert!(host.state().panning);
    }

    #[test]
    fn same_marker_twice_cancels_and_stays() {
        let (mut t, _host) = tools();
        t.apply(Command::DrawCable);
        t.handle(marker(1, PointerButton::Primary));
        assert_eq!(t.handle(marker(1, PointerButton::Primary)), None);
        assert_eq!(t.cable_start(), None);
        assert_eq!(t.mode(), ToolMode::DrawingCable);

        // A fresh start works afterwards.
        t.handle(marker(3, PointerButton::Primary));
        assert_eq!(t.cable_start(), Some(ObjectId(3)));
    }

    #[test]
    fn secondary_button_drops_the_start() {
        let (mut t, host) = tools();
        t.apply(Command::DrawCable);
        t.handle(marker(1, PointerButton::Primary));
        t.handle(mv(5.0, 5.0));
        assert!(host.state().preview.is_some());

        t.handle(MapEvent::PointerDown {
            position: LatLng::new(5.0, 5.0),
            button: PointerButton::Secondary,
        });
        assert_eq!(t.cable_start(), None);
        assert_eq!(t.mode(), ToolMode::DrawingCable);
        assert!(host.state().preview.is_none());
    }

    #[test]
    fn rubber_band_follows_pointer_until_released_away() {
        let (mut t, host) = tools();
        t.apply(Command::DrawCable);
        // Movement without a start shows nothing.
        t.handle(mv(1.0, 1.0));
        assert!(host.state().preview.is_none());

        t.handle(marker(1, PointerButton::Primary));
        t.handle(mv(2.0, 3.0));
        assert_eq!(
            host.state().preview,
            Some(Preview::Line {
                from: LatLng::new(1.0, 0.0),
                to: LatLng::new(2.0, 3.0),
            })
        );
        t.handle(up(2.0, 3.0));
        assert!(host.state().preview.is_none());
        assert_eq!(t.cable_start(), Some(ObjectId(1)));
    }

    #[test]
    fn cancel_exits_only_cancellable_modes() {
        let (mut t, _host) = tools();
        t.apply(Command::DrawCable);
        t.handle(marker(1, PointerButton::Primary));
        assert!(t.apply(Command::Cancel));
        assert_eq!(t.mode(), ToolMode::Idle);
        assert_eq!(t.cable_start(), None);

        t.apply(Command::PickCoordinate);
        assert!(t.apply(Command::Cancel));
        assert_eq!(t.mode(), ToolMode::Idle);

        t.apply(Command::Measure);
        assert!(!t.apply(Command::Cancel));
        assert_eq!(t.mode(), ToolMode::Measuring);
    }

    #[test]
    fn context_menu_cancels_the_cable_start() {
        let (mut t, host) = tools();
        t.apply(Command::DrawCable);
        assert!(t.held().contains(ListenerSet::CONTEXT_MENU));
        t.handle(marker(1, PointerButton::Primary));
        t.handle(mv(0.5, 0.5));
        assert!(host.state().preview.is_some());

        let menu = MapEvent::ContextMenu {
            position: LatLng::new(0.5, 0.5),
        };
        assert_eq!(t.handle(menu), None);
        assert_eq!(t.cable_start(), None);
        assert!(host.state().preview.is_none());
        assert_eq!(t.mode(), ToolMode::DrawingCable);
        assert_eq!(t.handle(marker(2, PointerButton::Primary)), None);
        assert_eq!(t.cable_start(), Some(ObjectId(2)));
    }

    #[test]
    fn leaving_cable_mode_discards_the_start() {
        let (mut t, _host) = tools();
        t.apply(Command::DrawCable);
        t.handle(marker(1, PointerButton::Primary));
        t.apply(Command::Measure);
        t.apply(Command::DrawCable);
        assert_eq!(t.cable_start(), None);
        // The next marker starts over instead of completing a cable.
        assert_eq!(t.handle(marker(2, PointerButton::Primary)), None);
    }

    #[test]
    fn held_listeners_track_every_mode() {
        let (mut t, host) = tools();
        let mut modes = vec![
            ToolMode::Measuring,
            ToolMode::SelectingRectangle,
            ToolMode::AddingPoint,
            ToolMode::PickingCoordinate,
            ToolMode::DrawingCable,
            ToolMode::Idle,
        ];
        modes.extend(DrawTool::iter().map(ToolMode::FreeDrawing));
        modes.push(ToolMode::DrawingCable);
        for mode in modes {
            t.set_mode(mode);
            assert_eq!(t.held(), mode.listeners());
            assert_eq!(host.state().registered, mode.listeners());
            assert_eq!(host.state().panning, mode.pans(false));
        }
    }

    #[test]
    fn events_without_a_listener_are_dropped() {
        let (mut t, _host) = tools();
        // Idle holds nothing.
        assert_eq!(t.handle(click(1.0, 1.0)), None);
        assert!(t.measurement().is_empty());

        t.apply(Command::Measure);
        assert_eq!(t.handle(marker(1, PointerButton::Primary)), None);
        assert_eq!(t.cable_start(), None);
    }

    #[test]
    fn teardown_releases_once() {
        let (mut t, host) = tools();
        t.apply(Command::Select);
        t.teardown();
        assert!(host.state().registered.is_empty());
        let released = host.state().unregistrations;
        t.teardown();
        assert_eq!(host.state().unregistrations, released);
    }

    #[test]
    fn drop_releases_held_listeners() {
        let host = RecordingHost::new(1000.0);
        {
            let mut t = MapTools::new(host.clone(), ToolConfig::default());
            t.select_tool(DrawTool::Polygon);
            assert!(!host.state().registered.is_empty());
        }
        assert!(host.state().registered.is_empty());
        assert_eq!(host.state().registrations, host.state().unregistrations);
    }

    #[test]
    fn measuring_survives_mode_switches_until_cleared() {
        let (mut t, _host) = tools();
        t.apply(Command::Measure);
        t.handle(click(0.0, 0.0));
        t.handle(click(0.0, 1.0));
        assert_eq!(t.measurement().points().len(), 2);
        assert!((t.measurement().total_km() - 111.195).abs() < 0.01);

        t.apply(Command::Select);
        t.apply(Command::Measure);
        assert_eq!(t.measurement().points().len(), 2);

        assert!(t.apply(Command::Clear));
        assert!(t.measurement().is_empty());
        assert!(!t.apply(Command::Clear));
    }

    #[test]
    fn placing_a_point_rounds_and_exits() {
        let (mut t, host) = tools();
        t.apply(Command::AddPoint);
        let effect = t.handle(click(50.123_456_78, 30.987_654_32));
        assert_eq!(
            effect,
            Some(ToolEffect::PointPlaced(LatLng::new(50.123457, 30.987654)))
        );
        assert_eq!(t.mode(), ToolMode::Idle);
        assert!(host.state().registered.is_empty());

        t.apply(Command::PickCoordinate);
        assert!(matches!(
            t.handle(click(1.0, 2.0)),
            Some(ToolEffect::CoordinatePicked(_))
        ));
    }

    #[test]
    fn rectangle_selection_is_inclusive() {
        let (mut t, host) = tools();
        t.apply(Command::Select);
        t.handle(down(0.0, 0.0));
        t.handle(mv(0.5, 0.5));
        assert!(matches!(host.state().preview, Some(Preview::Rectangle(_))));
        let effect = t.handle(up(1.0, 1.0));
        let bounds = GeoBounds::from_corners(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0));
        assert_eq!(effect, Some(ToolEffect::SelectionChanged(bounds)));
        assert!(host.state().preview.is_none());

        let object = |id, lat, lon| NetworkObject {
            id: ObjectId(id),
            name: format!("O{id}"),
            kind: ObjectKind::Pole,
            position: LatLng::new(lat, lon),
            address: None,
            description: None,
        };
        let objects = [
            object(1, 0.5, 0.5),
            object(2, 1.0, 1.0),
            object(3, 1.5, 0.5),
            object(4, 0.0, 0.0),
        ];
        let ids: Vec<_> = t
            .objects_in_selection(&objects)
            .iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![ObjectId(1), ObjectId(2), ObjectId(4)]);

        // Clear also drops the selection.
        t.apply(Command::Clear);
        assert!(t.objects_in_selection(&objects).is_empty());
    }

    #[test]
    fn line_needs_a_drag() {
        let (mut t, _host) = tools();
        t.select_tool(DrawTool::Line);
        t.handle(down(0.0, 0.0));
        assert_eq!(t.handle(up(0.0, 0.0)), None);
        assert!(t.sketch().is_empty());

        t.handle(down(0.0, 0.0));
        t.handle(mv(0.5, 0.5));
        assert_eq!(t.handle(up(1.0, 1.0)), Some(ToolEffect::ShapeAdded(0)));
        assert_eq!(
            t.sketch().shapes()[0],
            Shape::Line {
                from: LatLng::new(0.0, 0.0),
                to: LatLng::new(1.0, 1.0),
            }
        );
    }

    #[test]
    fn circle_radius_has_a_floor() {
        // Zoomed in far enough that a few meters is a visible drag.
        let (mut t, host) = tools_at_scale(10_000_000.0);
        t.select_tool(DrawTool::Circle);
        t.handle(down(0.0, 0.0));
        t.handle(mv(0.00003, 0.0));
        match host.state().preview.clone() {
            Some(Preview::Circle { radius_m, .. }) => assert_eq!(radius_m, 10.0),
            other => panic!("unexpected preview {other:?}"),
        }
        t.handle(up(0.00003, 0.0));
        assert!(matches!(
            t.sketch().shapes()[0],
            Shape::Circle { radius_m, .. } if radius_m == 10.0
        ));
    }

    #[test]
    fn freehand_collects_the_stroke() {
        let (mut t, host) = tools();
        t.select_tool(DrawTool::Freehand);
        t.handle(down(0.0, 0.0));
        t.handle(mv(0.1, 0.0));
        t.handle(mv(0.2, 0.1));
        assert!(matches!(host.state().preview, Some(Preview::Path(ref p)) if p.len() == 3));
        t.handle(up(0.3, 0.1));
        match &t.sketch().shapes()[0] {
            Shape::Freehand(points) => assert_eq!(points.len(), 4),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn polygon_closes_near_its_first_vertex() {
        let (mut t, _host) = tools();
        t.select_tool(DrawTool::Polygon);
        t.handle(click(0.0, 0.0));
        t.handle(click(0.0, 1.0));
        // Too few vertices to close yet.
        assert_eq!(t.handle(MapEvent::KeyDown(Key::Enter)), None);
        t.handle(click(1.0, 1.0));
        // 10 px from the first vertex.
        assert_eq!(t.handle(click(0.0, 0.01)), Some(ToolEffect::ShapeAdded(0)));
        match &t.sketch().shapes()[0] {
            Shape::Polygon(vertices) => assert_eq!(vertices.len(), 3),
            other => panic!("unexpected shape {other:?}"),
        }
    }

    #[test]
    fn polygon_closes_on_secondary_click() {
        let (mut t, _host) = tools();
        t.select_tool(DrawTool::Polygon);
        for (lat, lon) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
            t.handle(click(lat, lon));
        }
        let effect = t.handle(MapEvent::ContextMenu {
            position: LatLng::new(2.0, 2.0),
        });
        assert_eq!(effect, Some(ToolEffect::ShapeAdded(0)));
        assert!(matches!(&t.sketch().shapes()[0], Shape::Polygon(v) if v.len() == 4));
    }

    #[test]
    fn eraser_removes_topmost_shape() {
        let (mut t, _host) = tools();
        t.select_tool(DrawTool::Rectangle);
        for (a, b) in [(0.0, 2.0), (1.0, 3.0)] {
            t.handle(down(a, a));
            t.handle(mv(b, b));
            t.handle(up(b, b));
        }
        assert_eq!(t.sketch().len(), 2);

        t.select_tool(DrawTool::Eraser);
        let erased = t.handle(click(1.5, 1.5));
        let top = Shape::Rectangle(GeoBounds::from_corners(
            LatLng::new(1.0, 1.0),
            LatLng::new(3.0, 3.0),
        ));
        assert_eq!(erased, Some(ToolEffect::ShapeErased(top)));
        assert_eq!(t.handle(click(10.0, 10.0)), None);
        assert_eq!(t.sketch().len(), 1);
    }

    #[test]
    fn pan_key_suspends_drawing() {
        let (mut t, host) = tools();
        t.select_tool(DrawTool::Line);
        assert!(!host.state().panning);
        t.handle(down(0.0, 0.0));
        t.handle(mv(0.5, 0.5));

        t.handle(MapEvent::KeyDown(Key::Space));
        assert!(host.state().panning);
        assert!(host.state().preview.is_none());
        assert_eq!(t.handle(up(1.0, 1.0)), None);
        t.handle(down(0.0, 0.0));
        t.handle(mv(0.5, 0.5));
        assert!(host.state().preview.is_none());

        t.handle(MapEvent::KeyUp(Key::Space));
        assert!(!host.state().panning);
        assert_eq!(t.mode(), ToolMode::FreeDrawing(DrawTool::Line));
        assert!(t.sketch().is_empty());
    }

    #[test]
    fn hand_tool_pans_and_draw_toggle_exits() {
        let (mut t, host) = tools();
        t.apply(Command::FreeDraw);
        assert_eq!(t.mode(), ToolMode::FreeDrawing(DrawTool::Hand));
        assert!(host.state().panning);
        t.select_tool(DrawTool::Eraser);
        t.apply(Command::FreeDraw);
        assert_eq!(t.mode(), ToolMode::Idle);
    }

    #[test]
    fn clearing_shapes_keeps_the_tool() {
        let (mut t, _host) = tools();
        t.select_tool(DrawTool::Line);
        t.handle(down(0.0, 0.0));
        t.handle(mv(1.0, 1.0));
        t.handle(up(1.0, 1.0));
        t.handle(down(0.0, 0.0));
        t.handle(mv(1.0, 1.0));
        assert!(t.remove_shape(0).is_some());
        t.clear_shapes();
        assert!(t.sketch().is_empty());
        // The aborted stroke does not commit.
        assert_eq!(t.handle(up(1.0, 1.0)), None);
        assert_eq!(t.mode(), ToolMode::FreeDrawing(DrawTool::Line));
    }
}
