// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native drawable, seen from the core.
//!
//! Platform glue reports what happens to its window or view by calling the
//! signal methods of a [`SurfaceComponent`]: [`attach`], [`resize`],
//! [`show`], [`input`], and so on. The component records the observed
//! [`SurfaceState`] and forwards each signal through its [`SurfaceHooks`].
//! A [`Context`] installs hooks that update the graphics binding and
//! schedule listener notifications.
//!
//! Signals may arrive on any thread. Hooks are called after the state lock
//! is released. Attach, detach, and resize also hold a lifecycle lock across
//! their state update and their hook, so those three hooks never overlap and
//! run in the order their signals took effect.
//!
//! [`attach`]: SurfaceComponent::attach
//! [`resize`]: SurfaceComponent::resize
//! [`show`]: SurfaceComponent::show
//! [`input`]: SurfaceComponent::input
//! [`Context`]: crate::context::Context

use core::fmt;

use parking_lot::Mutex;

use crate::geometry::{SurfacePosition, SurfaceSize};
use crate::input::InputEvent;

/// What the core last observed about a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceState {
    /// Current size.
    pub size: SurfaceSize,
    /// Position relative to the parent.
    pub position: SurfacePosition,
    /// Whether the surface is shown.
    pub visible: bool,
    /// Whether the surface has input focus.
    pub focused: bool,
    /// Whether the native drawable exists.
    pub attached: bool,
}

type Hook<T> = Box<dyn Fn(T) + Send + Sync>;

/// Callbacks a [`SurfaceComponent`] forwards its signals to.
///
/// Unset hooks do nothing.
pub struct SurfaceHooks {
    /// The drawable was created with the given size.
    pub on_attach: Hook<SurfaceSize>,
    /// The drawable is going away.
    pub on_detach: Hook<()>,
    /// The drawable changed size.
    pub on_resize: Hook<SurfaceSize>,
    /// The drawable moved.
    pub on_move: Hook<SurfacePosition>,
    /// The drawable was shown.
    pub on_show: Hook<()>,
    /// The drawable was hidden.
    pub on_hide: Hook<()>,
    /// The drawable gained focus.
    pub on_focus_gain: Hook<()>,
    /// The drawable lost focus.
    pub on_focus_lost: Hook<()>,
    /// An input event arrived.
    pub on_input: Hook<InputEvent>,
}

impl Default for SurfaceHooks {
    fn default() -> Self {
        Self {
            on_attach: Box::new(|_| {}),
            on_detach: Box::new(|()| {}),
            on_resize: Box::new(|_| {}),
            on_move: Box::new(|_| {}),
            on_show: Box::new(|()| {}),
            on_hide: Box::new(|()| {}),
            on_focus_gain: Box::new(|()| {}),
            on_focus_lost: Box::new(|()| {}),
            on_input: Box::new(|_| {}),
        }
    }
}

impl fmt::Debug for SurfaceHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHooks").finish_non_exhaustive()
    }
}

/// Receives native surface signals and forwards them to [`SurfaceHooks`].
pub struct SurfaceComponent {
    lifecycle: Mutex<()>,
    state: Mutex<SurfaceState>,
    hooks: SurfaceHooks,
    focus_on_show: bool,
}

impl fmt::Debug for SurfaceComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceComponent")
            .field("state", &*self.state.lock())
            .field("focus_on_show", &self.focus_on_show)
            .finish_non_exhaustive()
    }
}

impl SurfaceComponent {
    /// Creates a detached, hidden, unfocused component.
    ///
    /// With `focus_on_show`, showing an unfocused surface also raises a
    /// focus gain.
    #[must_use]
    pub fn new(hooks: SurfaceHooks, focus_on_show: bool) -> Self {
        Self {
            lifecycle: Mutex::new(()),
            state: Mutex::new(SurfaceState::default()),
            hooks,
            focus_on_show,
        }
    }

    /// A snapshot of the observed state.
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        *self.state.lock()
    }

    /// Whether the drawable exists.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.lock().attached
    }

    /// The drawable was created. Ignored while already attached.
    ///
    /// Blocks while another attach, detach, or resize hook is running.
    pub fn attach(&self, size: SurfaceSize) -> bool {
        let _lifecycle = self.lifecycle.lock();
        {
            let mut state = self.state.lock();
            if state.attached {
                log::debug!("ignoring attach of an attached surface");
                return false;
            }
            state.attached = true;
            state.size = size;
        }
        (self.hooks.on_attach)(size);
        true
    }

    /// The drawable is going away. Ignored while detached.
    ///
    /// Blocks while another attach, detach, or resize hook is running.
    pub fn detach(&self) -> bool {
        let _lifecycle = self.lifecycle.lock();
        {
            let mut state = self.state.lock();
            if !state.attached {
                log::debug!("ignoring detach of a detached surface");
                return false;
            }
            state.attached = false;
        }
        (self.hooks.on_detach)(());
        true
    }

    /// The drawable changed size.
    pub fn resize(&self, size: SurfaceSize) {
        let _lifecycle = self.lifecycle.lock();
        self.state.lock().size = size;
        (self.hooks.on_resize)(size);
    }

    /// The drawable moved relative to its parent.
    pub fn move_to(&self, position: SurfacePosition) {
        self.state.lock().position = position;
        (self.hooks.on_move)(position);
    }

    /// The drawable became visible.
    pub fn show(&self) {
        let request_focus = {
            let mut state = self.state.lock();
            state.visible = true;
            self.focus_on_show && !state.focused
        };
        (self.hooks.on_show)(());
        if request_focus {
            self.focus_gained();
        }
    }

    /// The drawable became hidden.
    pub fn hide(&self) {
        self.state.lock().visible = false;
        (self.hooks.on_hide)(());
    }

    /// The drawable gained input focus. Ignored while focused.
    pub fn focus_gained(&self) {
        if core::mem::replace(&mut self.state.lock().focused, true) {
            return;
        }
        (self.hooks.on_focus_gain)(());
    }

    /// The drawable lost input focus. Ignored while unfocused.
    pub fn focus_lost(&self) {
        if !core::mem::replace(&mut self.state.lock().focused, false) {
            return;
        }
        (self.hooks.on_focus_lost)(());
    }

    /// An input event arrived.
    pub fn input(&self, event: InputEvent) {
        (self.hooks.on_input)(event);
    }
}
