// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pixel storage: mutable [`PixelBuffer`]s and immutable [`Bitmap`]s.
//!
//! A [`PixelBuffer`] is what backends allocate for back buffers and snapshot
//! targets. Freezing it with [`PixelBuffer::into_bitmap`] yields a cheaply
//! cloneable [`Bitmap`] that can be handed to the listener.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::SurfaceError;
use crate::geometry::{PixelRect, SurfaceSize};
use crate::graphics::DrawTarget;

/// A non-premultiplied 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgba8(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgba8(255, 255, 255, 255);

    /// Creates a colour from its channels.
    #[inline]
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour.
    #[inline]
    #[must_use]
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba8(r, g, b, 255)
    }

    /// Returns the channels in RGBA byte order.
    #[inline]
    #[must_use]
    pub const fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Memory layout of image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// Four bytes per pixel: red, green, blue, alpha.
    #[default]
    Rgba8888,
}

impl PixelFormat {
    /// Bytes used by one pixel.
    #[inline]
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8888 => 4,
        }
    }
}

/// A mutable, tightly packed RGBA8888 pixel buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    size: SurfaceSize,
    data: Vec<u8>,
}

impl core::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Allocates a transparent buffer of the given size.
    ///
    /// A zero-area size yields an empty buffer; use [`try_new`](Self::try_new)
    /// where an empty image is an error.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            data: vec![0; size.area() * PixelFormat::Rgba8888.bytes_per_pixel()],
        }
    }

    /// Allocates a transparent buffer, rejecting zero-area sizes.
    pub fn try_new(size: SurfaceSize) -> Result<Self, SurfaceError> {
        if size.is_empty() {
            return Err(SurfaceError::EmptySurface);
        }
        Ok(Self::new(size))
    }

    /// Buffer dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reads one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        read_pixel(&self.data, self.size, x, y)
    }

    /// Fills the whole buffer with `color`.
    pub fn clear(&mut self, color: Color) {
        self.fill_rect(PixelRect::full(self.size), color);
    }

    /// Overwrites the pixels in `rect` with `color`.
    ///
    /// Pixels outside the buffer are ignored.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Color) {
        let x1 = rect.x1.min(self.size.width);
        let y1 = rect.y1.min(self.size.height);
        if rect.x0 >= x1 || rect.y0 >= y1 {
            return;
        }
        let rgba = color.to_rgba8();
        let stride = self.size.width as usize * 4;
        for y in rect.y0..y1 {
            let row = y as usize * stride;
            let start = row + rect.x0 as usize * 4;
            let end = row + x1 as usize * 4;
            for px in self.data[start..end].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Copies every pixel of `other` into `self`, resizing if needed.
    pub fn copy_from(&mut self, other: &Self) {
        self.size = other.size;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }

    /// Freezes the buffer into an immutable [`Bitmap`].
    #[must_use]
    pub fn into_bitmap(self) -> Bitmap {
        Bitmap {
            size: self.size,
            format: PixelFormat::Rgba8888,
            data: self.data.into(),
        }
    }

    /// Copies the current pixels into a new [`Bitmap`].
    #[must_use]
    pub fn to_bitmap(&self) -> Bitmap {
        self.clone().into_bitmap()
    }
}

impl DrawTarget for PixelBuffer {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn fill(&mut self, rect: PixelRect, color: Color) {
        self.fill_rect(rect, color);
    }
}

/// A [`PixelBuffer`] shared between its owner and a drawing handle.
///
/// Backends keep one of these per back buffer and hand out clones as
/// [`DrawTarget`]s; the pipelines use one for the snapshot target so the
/// pixels can be reclaimed once the drawing handle is released.
#[derive(Clone, Debug)]
pub struct SharedPixelBuffer {
    inner: Arc<Mutex<PixelBuffer>>,
}

impl SharedPixelBuffer {
    /// Wraps a buffer.
    #[must_use]
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(buffer)),
        }
    }

    /// Runs `f` with exclusive access to the pixels.
    pub fn with<R>(&self, f: impl FnOnce(&mut PixelBuffer) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Reclaims the pixels as a [`Bitmap`].
    ///
    /// Copies only if another handle is still alive.
    #[must_use]
    pub fn into_bitmap(self) -> Bitmap {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner().into_bitmap(),
            Err(shared) => shared.lock().to_bitmap(),
        }
    }
}

impl DrawTarget for SharedPixelBuffer {
    fn size(&self) -> SurfaceSize {
        self.inner.lock().size
    }

    fn fill(&mut self, rect: PixelRect, color: Color) {
        self.inner.lock().fill_rect(rect, color);
    }
}

/// An immutable RGBA8888 image.
///
/// Cloning shares the pixel storage.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    size: SurfaceSize,
    format: PixelFormat,
    data: Arc<[u8]>,
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bitmap")
            .field("size", &self.size)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Image width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Image height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Image dimensions.
    #[inline]
    #[must_use]
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Pixel layout.
    #[inline]
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw pixel bytes, row-major.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Reads one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        read_pixel(&self.data, self.size, x, y)
    }
}

fn read_pixel(data: &[u8], size: SurfaceSize, x: u32, y: u32) -> Option<Color> {
    if x >= size.width || y >= size.height {
        return None;
    }
    let idx = (y as usize * size.width as usize + x as usize) * 4;
    let px = data.get(idx..idx + 4)?;
    Some(Color::from_rgba8(px[0], px[1], px[2], px[3]))
}
