// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Map input events, the listener kinds that receive them, and keyboard
//! shortcuts.

use fibermap_model::{LatLng, ObjectId};

bitflags::bitflags! {
    /// Kinds of map listeners a tool mode holds.
    ///
    /// The host wires one native handler per kind. [`MapTools`](crate::MapTools)
    /// asks the host to register and unregister whole sets at mode
    /// transitions, and drops events whose kind is not held.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ListenerSet: u16 {
        /// A completed click on the map surface.
        const CLICK        = 1 << 0;
        /// A button press on the map surface.
        const POINTER_DOWN = 1 << 1;
        /// Pointer movement over the map.
        const POINTER_MOVE = 1 << 2;
        /// A button release anywhere.
        const POINTER_UP   = 1 << 3;
        /// The context-menu gesture, usually a secondary click.
        const CONTEXT_MENU = 1 << 4;
        /// A key press.
        const KEY_DOWN     = 1 << 5;
        /// A key release.
        const KEY_UP       = 1 << 6;
        /// A button press on an object marker.
        const MARKER_DOWN  = 1 << 7;
    }
}

/// Which pointer button an event carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Usually the left button, or a touch.
    Primary,
    /// Usually the right button.
    Secondary,
    /// Any other button.
    Auxiliary,
}

/// Keys the tools care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character.
    Character(char),
    /// The cancel key.
    Escape,
    /// The confirm key; closes a polygon.
    Enter,
    /// The pan key; held to pan while free drawing.
    Space,
}

/// One input event from the map host.
///
/// A press on an object marker is reported as [`MapEvent::MarkerDown`] only,
/// never also as [`MapEvent::PointerDown`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapEvent {
    /// A completed click at `position`.
    Click {
        /// Clicked position.
        position: LatLng,
    },
    /// A button went down over the map.
    PointerDown {
        /// Pointer position.
        position: LatLng,
        /// The pressed button.
        button: PointerButton,
    },
    /// The pointer moved.
    PointerMove {
        /// Pointer position.
        position: LatLng,
    },
    /// A button was released.
    PointerUp {
        /// Pointer position.
        position: LatLng,
        /// Whether the release happened over an object marker.
        over_marker: bool,
    },
    /// The context-menu gesture at `position`.
    ContextMenu {
        /// Pointer position.
        position: LatLng,
    },
    /// A key went down.
    KeyDown(Key),
    /// A key went up.
    KeyUp(Key),
    /// A button went down on the marker of `object`.
    MarkerDown {
        /// The object under the pointer.
        object: ObjectId,
        /// The marker's position.
        position: LatLng,
        /// The pressed button.
        button: PointerButton,
    },
}

impl MapEvent {
    /// The listener kind that receives this event.
    pub fn listener(&self) -> ListenerSet {
        match self {
            Self::Click { .. } => ListenerSet::CLICK,
            Self::PointerDown { .. } => ListenerSet::POINTER_DOWN,
            Self::PointerMove { .. } => ListenerSet::POINTER_MOVE,
            Self::PointerUp { .. } => ListenerSet::POINTER_UP,
            Self::ContextMenu { .. } => ListenerSet::CONTEXT_MENU,
            Self::KeyDown(_) => ListenerSet::KEY_DOWN,
            Self::KeyUp(_) => ListenerSet::KEY_UP,
            Self::MarkerDown { .. } => ListenerSet::MARKER_DOWN,
        }
    }
}

/// Operator commands, usually bound to keyboard shortcuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum Command {
    /// Toggle measuring.
    Measure,
    /// Toggle rectangle selection.
    Select,
    /// Toggle adding a point.
    AddPoint,
    /// Toggle cable drawing.
    DrawCable,
    /// Toggle free drawing.
    FreeDraw,
    /// Toggle picking a coordinate for a form.
    PickCoordinate,
    /// Discard measurement points and the selection rectangle.
    Clear,
    /// Leave cable drawing, point adding or coordinate picking.
    Cancel,
}

impl Command {
    /// The command bound to `key`, if any.
    ///
    /// Letters match in either case. The host must not forward keys typed
    /// into a text input.
    pub fn for_key(key: Key) -> Option<Self> {
        match key {
            Key::Escape => Some(Self::Cancel),
            Key::Character(c) => match c.to_ascii_lowercase() {
                'm' => Some(Self::Measure),
                's' => Some(Self::Select),
                'p' => Some(Self::AddPoint),
                'k' => Some(Self::DrawCable),
                'd' => Some(Self::FreeDraw),
                'c' => Some(Self::Clear),
                _ => None,
            },
            Key::Enter | Key::Space => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcuts_ignore_case() {
        assert_eq!(Command::for_key(Key::Character('K')), Some(Command::DrawCable));
        assert_eq!(Command::for_key(Key::Character('m')), Some(Command::Measure));
        assert_eq!(Command::for_key(Key::Escape), Some(Command::Cancel));
        assert_eq!(Command::for_key(Key::Character('x')), None);
        assert_eq!(Command::for_key(Key::Space), None);
    }

    #[test]
    fn every_event_maps_to_one_listener() {
        let p = LatLng::new(0.0, 0.0);
        let events = [
            MapEvent::Click { position: p },
            MapEvent::PointerDown {
                position: p,
                button: PointerButton::Primary,
            },
            MapEvent::PointerMove { position: p },
            MapEvent::PointerUp {
                position: p,
                over_marker: false,
            },
            MapEvent::ContextMenu { position: p },
            MapEvent::KeyDown(Key::Enter),
            MapEvent::KeyUp(Key::Space),
            MapEvent::MarkerDown {
                object: ObjectId(1),
                position: p,
                button: PointerButton::Primary,
            },
        ];
        let mut seen = ListenerSet::empty();
        for event in events {
            let kind = event.listener();
            assert_eq!(kind.bits().count_ones(), 1);
            assert!(!seen.intersects(kind));
            seen |= kind;
        }
        assert_eq!(seen, ListenerSet::all());
    }
}
