// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU buffer chain.

use core::fmt;
use std::sync::Arc;

use easel_core::backend::BufferChain;
use easel_core::error::SurfaceError;
use easel_core::geometry::SurfaceSize;
use easel_core::graphics::DrawTarget;
use easel_core::image::{Color, PixelBuffer, SharedPixelBuffer};
use parking_lot::Mutex;

use crate::display::Display;

/// A ring of RGBA back buffers presenting into a [`SoftwareBackend`]'s
/// display.
///
/// Invalidations come from the display's
/// [`InvalidationScript`](crate::InvalidationScript): a restored answer wipes
/// the current back buffer, a lost answer reverts the front buffer to what it
/// showed before the last present.
///
/// [`SoftwareBackend`]: crate::SoftwareBackend
pub struct SoftwareBufferChain {
    display: Arc<Mutex<Display>>,
    id: u32,
    size: SurfaceSize,
    buffers: Vec<SharedPixelBuffer>,
    back: usize,
    replaced_front: Option<PixelBuffer>,
}

impl fmt::Debug for SoftwareBufferChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftwareBufferChain")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("buffers", &self.buffers.len())
            .field("back", &self.back)
            .finish_non_exhaustive()
    }
}

impl SoftwareBufferChain {
    pub(crate) fn new(
        display: Arc<Mutex<Display>>,
        id: u32,
        size: SurfaceSize,
        buffers: u32,
    ) -> Self {
        Self {
            display,
            id,
            size,
            buffers: allocate(size, buffers.max(2) as usize),
            back: 0,
            replaced_front: None,
        }
    }

    /// Index of the buffer the next pass draws into.
    #[must_use]
    pub fn back_index(&self) -> usize {
        self.back
    }

    /// Number of buffers in the ring.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }
}

fn allocate(size: SurfaceSize, count: usize) -> Vec<SharedPixelBuffer> {
    (0..count)
        .map(|_| SharedPixelBuffer::new(PixelBuffer::new(size)))
        .collect()
}

impl BufferChain for SoftwareBufferChain {
    fn draw_target(&mut self) -> Result<Box<dyn DrawTarget>, SurfaceError> {
        let buffer = self
            .buffers
            .get(self.back)
            .ok_or_else(|| SurfaceError::Acquire(format!("no back buffer {}", self.back)))?;
        self.display.lock().acquires += 1;
        Ok(Box::new(buffer.clone()))
    }

    fn contents_restored(&mut self) -> bool {
        let restored = self.display.lock().next_restored();
        if restored {
            log::trace!("chain {}: back buffer {} restored", self.id, self.back);
            self.buffers[self.back].with(|b| b.clear(Color::TRANSPARENT));
        }
        restored
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let index = self.back;
        let buffer = self
            .buffers
            .get(index)
            .ok_or_else(|| SurfaceError::Present(format!("no back buffer {index}")))?;
        self.replaced_front = buffer.with(|pixels| self.display.lock().show(self.id, index, pixels));
        self.back = (index + 1) % self.buffers.len();
        Ok(())
    }

    fn contents_lost(&mut self) -> bool {
        let mut display = self.display.lock();
        let lost = display.next_lost();
        if lost {
            log::trace!("chain {}: present lost", self.id);
            display.revert(self.replaced_front.take());
        }
        lost
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.buffers = allocate(size, self.buffers.len());
        self.back = 0;
    }
}
