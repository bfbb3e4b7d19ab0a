// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The application's view of a surface.

use crate::context::Context;
use crate::graphics::Graphics;
use crate::image::Bitmap;
use crate::input::InputEvent;

/// Receives lifecycle, window, input, and paint notifications for one
/// [`Context`].
///
/// Every method runs on the dispatch thread, one at a time, and defaults to
/// doing nothing.
///
/// # Re-entrancy
///
/// `on_paint` runs while the context's graphics binding is locked. Calling
/// [`GraphicsHandle::with`](crate::context::GraphicsHandle::with) from inside
/// it deadlocks; draw through the `graphics` argument instead. Requesting
/// another paint or snapshot from any callback is fine.
pub trait ContextListener: Send + Sync {
    /// The surface attached and its graphics binding exists.
    fn on_create(&self, context: &Context) {
        _ = context;
    }

    /// The surface detached. The binding is cleared right after this returns.
    fn on_dispose(&self, context: &Context) {
        _ = context;
    }

    /// The surface became visible.
    fn on_show(&self, context: &Context) {
        _ = context;
    }

    /// The surface became hidden.
    fn on_hide(&self, context: &Context) {
        _ = context;
    }

    /// The surface gained input focus.
    fn on_focus_gain(&self, context: &Context) {
        _ = context;
    }

    /// The surface lost input focus.
    fn on_focus_lost(&self, context: &Context) {
        _ = context;
    }

    /// The surface was resized; the binding already has the new size.
    fn on_resize(&self, context: &Context, width: u32, height: u32) {
        _ = (context, width, height);
    }

    /// The surface moved relative to its parent.
    fn on_move(&self, context: &Context, x: i32, y: i32) {
        _ = (context, x, y);
    }

    /// Draw one pass into `graphics`.
    ///
    /// `snapshot` is `true` when the target is an offscreen snapshot image
    /// rather than the live back buffer. A live frame may call this several
    /// times before presenting.
    fn on_paint(&self, context: &Context, graphics: &mut Graphics, snapshot: bool) {
        _ = (context, graphics, snapshot);
    }

    /// A requested snapshot is ready.
    fn on_snapshot(&self, context: &Context, snapshot: Bitmap) {
        _ = (context, snapshot);
    }

    /// An input event arrived. Returns whether it was handled.
    fn on_input(&self, context: &Context, event: &InputEvent) -> bool {
        _ = (context, event);
        false
    }
}
