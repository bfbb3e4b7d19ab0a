// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer surface geometry and surface identification.
//!
//! Drawing-space geometry (transforms, clip rectangles) uses [`kurbo`]. The
//! types here describe the surface itself in whole device pixels.

use core::fmt;
use core::sync::atomic::{AtomicU32, Ordering};

use kurbo::Rect;

/// Identifies one surface.
///
/// Every [`Context`](crate::context::Context) allocates a fresh id; trace
/// consumers use it to separate events from several surfaces.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Debug for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SurfaceId({})", self.0)
    }
}

/// Size of a surface in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// A zero-area size.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a size from width and height.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The full surface as a [`kurbo::Rect`] anchored at the origin.
    #[inline]
    #[must_use]
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Position of a surface relative to its parent, in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct SurfacePosition {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

impl SurfacePosition {
    /// Creates a position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle, already clipped to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl PixelRect {
    /// Snaps a device-space rectangle to whole pixels inside `bounds`.
    ///
    /// Returns `None` when nothing of `rect` lies within `bounds`.
    #[must_use]
    pub fn from_rect(rect: Rect, bounds: SurfaceSize) -> Option<Self> {
        let snapped = rect.intersect(bounds.to_rect()).round();
        if snapped.width() <= 0.0 || snapped.height() <= 0.0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            reason = "values are clamped to the u32 bounds of the target"
        )]
        let to_px = |v: f64| v.max(0.0) as u32;
        Some(Self {
            x0: to_px(snapped.x0),
            y0: to_px(snapped.y0),
            x1: to_px(snapped.x1).min(bounds.width),
            y1: to_px(snapped.y1).min(bounds.height),
        })
    }

    /// The full area of `size`.
    #[inline]
    #[must_use]
    pub const fn full(size: SurfaceSize) -> Self {
        Self {
            x0: 0,
            y0: 0,
            x1: size.width,
            y1: size.height,
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_ids_are_unique() {
        let a = SurfaceId::next();
        let b = SurfaceId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn pixel_rect_clamps_to_bounds() {
        let bounds = SurfaceSize::new(10, 10);
        let px = PixelRect::from_rect(Rect::new(-5.0, 2.0, 20.0, 4.0), bounds).unwrap();
        assert_eq!(
            px,
            PixelRect {
                x0: 0,
                y0: 2,
                x1: 10,
                y1: 4
            }
        );
    }

    #[test]
    fn pixel_rect_outside_bounds_is_none() {
        let bounds = SurfaceSize::new(10, 10);
        assert!(PixelRect::from_rect(Rect::new(20.0, 20.0, 30.0, 30.0), bounds).is_none());
        assert!(PixelRect::from_rect(Rect::new(1.0, 1.0, 5.0, 5.0), SurfaceSize::ZERO).is_none());
    }

    #[test]
    fn empty_sizes() {
        assert!(SurfaceSize::new(0, 5).is_empty());
        assert!(!SurfaceSize::new(1, 1).is_empty());
        assert_eq!(SurfaceSize::new(800, 600).area(), 480_000);
    }
}
