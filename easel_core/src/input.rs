// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input events delivered to [`ContextListener::on_input`].
//!
//! The core only carries these from the platform glue to the listener; it
//! neither interprets nor synthesises them.
//!
//! [`ContextListener::on_input`]: crate::listener::ContextListener::on_input

use bitflags::bitflags;

bitflags! {
    /// Modifier keys and buttons held while an event was generated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        /// Either shift key.
        const SHIFT = 1 << 0;
        /// Either control key.
        const CONTROL = 1 << 1;
        /// Either alt/option key.
        const ALT = 1 << 2;
        /// Either meta/command/super key.
        const META = 1 << 3;
        /// Caps lock is on.
        const CAPS_LOCK = 1 << 4;
        /// Num lock is on.
        const NUM_LOCK = 1 << 5;
    }
}

/// Where on the keyboard a key sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum KeyLocation {
    /// The only key of its kind.
    #[default]
    Standard,
    /// Left-hand variant (e.g. left shift).
    Left,
    /// Right-hand variant.
    Right,
    /// On the numeric keypad.
    Numpad,
}

/// A pointer button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Primary button or touch contact.
    Primary,
    /// Secondary (context) button.
    Secondary,
    /// Middle button or wheel press.
    Middle,
    /// Any other button, by platform index.
    Other(u16),
}

/// Units of a scroll delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScrollUnit {
    /// Pixels.
    #[default]
    Pixel,
    /// Lines of text.
    Line,
    /// Pages.
    Page,
}

/// A key press or release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// Logical key value (`"a"`, `"Enter"`).
    pub key: String,
    /// Physical key code (`"KeyA"`, `"Enter"`).
    pub code: String,
    /// Keyboard location.
    pub location: KeyLocation,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

/// A pointer position in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Horizontal offset from the surface origin.
    pub x: f32,
    /// Vertical offset from the surface origin.
    pub y: f32,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Pointer id (touch contact or mouse).
    pub id: u32,
    /// Button involved, if any.
    pub button: Option<PointerButton>,
}

/// One input event.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// A key went down.
    KeyDown(KeyEvent),
    /// A key went up.
    KeyUp(KeyEvent),
    /// A character was typed.
    KeyTyped(char),
    /// A pointer button went down.
    PointerDown(PointerEvent),
    /// A pointer button went up.
    PointerUp(PointerEvent),
    /// A pointer button was clicked.
    PointerClick(PointerEvent),
    /// A pointer moved with a button held.
    PointerDrag(PointerEvent),
    /// A touch contact was held in place.
    TouchLongPress(PointerEvent),
    /// The mouse moved with no button held.
    MouseMove(PointerEvent),
    /// The mouse entered the surface.
    MouseEnter(PointerEvent),
    /// The mouse left the surface.
    MouseExit(PointerEvent),
    /// A scroll wheel or gesture.
    Scroll {
        /// Horizontal amount.
        dx: f32,
        /// Vertical amount.
        dy: f32,
        /// Units of `dx` and `dy`.
        unit: ScrollUnit,
    },
}

impl InputEvent {
    /// Modifiers held during the event, where the event carries them.
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::KeyDown(k) | Self::KeyUp(k) => k.modifiers,
            Self::PointerDown(p)
            | Self::PointerUp(p)
            | Self::PointerClick(p)
            | Self::PointerDrag(p)
            | Self::TouchLongPress(p)
            | Self::MouseMove(p)
            | Self::MouseEnter(p)
            | Self::MouseExit(p) => p.modifiers,
            Self::KeyTyped(_) | Self::Scroll { .. } => Modifiers::empty(),
        }
    }

    /// Pointer position, for pointer and mouse events.
    #[must_use]
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown(p)
            | Self::PointerUp(p)
            | Self::PointerClick(p)
            | Self::PointerDrag(p)
            | Self::TouchLongPress(p)
            | Self::MouseMove(p)
            | Self::MouseEnter(p)
            | Self::MouseExit(p) => Some((p.x, p.y)),
            _ => None,
        }
    }
}
