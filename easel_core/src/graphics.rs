// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The graphics context handed to [`ContextListener::on_paint`].
//!
//! A [`Graphics`] lives as long as the surface attachment that created it. It
//! carries logical size and drawing state (transform, clip, colour) and is
//! bound to a different [`DrawTarget`] for every paint pass: a fresh back
//! buffer from the chain for live frames, an offscreen buffer for snapshots.
//!
//! [`ContextListener::on_paint`]: crate::listener::ContextListener::on_paint

use core::fmt;
use core::ops::{Deref, DerefMut};

use kurbo::{Affine, Rect, Vec2};

use crate::geometry::{PixelRect, SurfaceSize};
use crate::image::Color;

/// Something the graphics context can draw into.
///
/// Back-buffer handles and offscreen images both implement this. Dropping the
/// handle releases it.
pub trait DrawTarget: Send {
    /// Size of the target in pixels.
    fn size(&self) -> SurfaceSize;

    /// Overwrites the pixels of `rect` with `color`.
    ///
    /// `rect` is already clipped to [`size`](Self::size).
    fn fill(&mut self, rect: PixelRect, color: Color);
}

/// Mutable drawing state bound to one surface attachment.
pub struct Graphics {
    size: SurfaceSize,
    transform: Affine,
    clip: Option<Rect>,
    color: Color,
    target: Option<Box<dyn DrawTarget>>,
}

impl fmt::Debug for Graphics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graphics")
            .field("size", &self.size)
            .field("transform", &self.transform)
            .field("clip", &self.clip)
            .field("color", &self.color)
            .field("bound", &self.target.is_some())
            .finish()
    }
}

impl Graphics {
    /// Creates an unbound context of the given logical size.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            transform: Affine::IDENTITY,
            clip: None,
            color: Color::BLACK,
            target: None,
        }
    }

    /// Logical size of the surface.
    #[inline]
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Logical width of the surface.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Logical height of the surface.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub(crate) fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    /// Returns `true` while a drawing target is bound.
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.target.is_some()
    }

    /// Clears accumulated transform, clip, and colour state.
    pub fn reset(&mut self) {
        self.transform = Affine::IDENTITY;
        self.clip = None;
        self.color = Color::BLACK;
    }

    /// Current fill colour.
    #[inline]
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the fill colour used by [`fill_rect`](Self::fill_rect).
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Current user-to-device transform.
    #[inline]
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Replaces the user-to-device transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    /// Prepends a translation in user space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * Affine::translate(Vec2::new(dx, dy));
    }

    /// Prepends a non-uniform scale in user space.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform * Affine::scale_non_uniform(sx, sy);
    }

    /// Current clip in device space, if any.
    #[inline]
    #[must_use]
    pub fn clip(&self) -> Option<Rect> {
        self.clip
    }

    /// Intersects the clip with `rect` (in user space).
    pub fn clip_rect(&mut self, rect: Rect) {
        let device = self.transform.transform_rect_bbox(rect);
        self.clip = Some(match self.clip {
            Some(clip) => clip.intersect(device),
            None => device,
        });
    }

    /// Fills `rect` (in user space) with the current colour.
    pub fn fill_rect(&mut self, rect: Rect) {
        let color = self.color;
        self.paint_rect(rect, color);
    }

    /// Fills `rect` (in user space) with `color`, leaving the current colour
    /// untouched.
    pub fn clear_rect(&mut self, rect: Rect, color: Color) {
        self.paint_rect(rect, color);
    }

    fn paint_rect(&mut self, rect: Rect, color: Color) {
        let Some(target) = self.target.as_mut() else {
            return;
        };
        let mut device = self.transform.transform_rect_bbox(rect);
        if let Some(clip) = self.clip {
            device = device.intersect(clip);
        }
        if let Some(px) = PixelRect::from_rect(device, target.size()) {
            target.fill(px, color);
        }
    }

    /// Binds `target` until the returned guard is dropped.
    ///
    /// Dropping the guard releases the target, including during unwinding.
    pub(crate) fn bind(&mut self, target: Box<dyn DrawTarget>) -> BoundGraphics<'_> {
        self.target = Some(target);
        BoundGraphics { graphics: self }
    }
}

/// A [`Graphics`] with a drawing target bound for one paint pass.
pub(crate) struct BoundGraphics<'a> {
    graphics: &'a mut Graphics,
}

impl Deref for BoundGraphics<'_> {
    type Target = Graphics;

    fn deref(&self) -> &Graphics {
        self.graphics
    }
}

impl DerefMut for BoundGraphics<'_> {
    fn deref_mut(&mut self) -> &mut Graphics {
        self.graphics
    }
}

impl Drop for BoundGraphics<'_> {
    fn drop(&mut self) {
        self.graphics.target = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{PixelBuffer, SharedPixelBuffer};

    const RED: Color = Color::from_rgb8(255, 0, 0);

    fn target(size: SurfaceSize) -> (SharedPixelBuffer, Box<dyn DrawTarget>) {
        let shared = SharedPixelBuffer::new(PixelBuffer::new(size));
        let handle = Box::new(shared.clone());
        (shared, handle)
    }

    #[test]
    fn unbound_fill_is_a_noop() {
        let mut g = Graphics::new(SurfaceSize::new(4, 4));
        g.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert!(!g.is_bound());
    }

    #[test]
    fn guard_releases_target() {
        let size = SurfaceSize::new(4, 4);
        let (shared, handle) = target(size);
        let mut g = Graphics::new(size);
        {
            let mut bound = g.bind(handle);
            assert!(bound.is_bound());
            bound.set_color(RED);
            bound.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        }
        assert!(!g.is_bound());
        let bitmap = shared.into_bitmap();
        assert_eq!(bitmap.pixel(0, 0), Some(RED));
        assert_eq!(bitmap.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn transform_and_clip_apply() {
        let size = SurfaceSize::new(8, 8);
        let (shared, handle) = target(size);
        let mut g = Graphics::new(size);
        {
            let mut bound = g.bind(handle);
            bound.translate(2.0, 2.0);
            bound.clip_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
            bound.clear_rect(Rect::new(0.0, 0.0, 8.0, 8.0), RED);
        }
        let bitmap = shared.into_bitmap();
        assert_eq!(bitmap.pixel(2, 2), Some(RED));
        assert_eq!(bitmap.pixel(3, 3), Some(RED));
        assert_eq!(bitmap.pixel(4, 4), Some(Color::TRANSPARENT));
        assert_eq!(bitmap.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn reset_clears_state_but_keeps_size() {
        let mut g = Graphics::new(SurfaceSize::new(10, 20));
        g.translate(5.0, 5.0);
        g.scale(2.0, 2.0);
        g.clip_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        g.set_color(RED);

        g.reset();

        assert_eq!(g.transform(), Affine::IDENTITY);
        assert_eq!(g.clip(), None);
        assert_eq!(g.color(), Color::BLACK);
        assert_eq!(g.size(), SurfaceSize::new(10, 20));
    }
}
