// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for platform integrations.
//!
//! Easel splits platform-specific work into *backend* crates. Each backend
//! provides the following pieces:
//!
//! - **Buffer chain**: Implements [`BufferChain`]: hands out drawing targets
//!   for the current back buffer, presents it, and reports whether buffer
//!   memory was restored or a presentation was lost. These four queries are
//!   everything the paint pipeline's retry loop relies on.
//!
//! - **Allocator**: Implements [`SurfaceBackend`]: creates a buffer chain
//!   when a surface attaches and allocates offscreen images for snapshots.
//!
//! - **Signal glue**: Drives the
//!   [`SurfaceComponent`](crate::surface::SurfaceComponent) of a
//!   [`Context`](crate::context::Context) from native window events. This is
//!   backend-specific and not abstracted by a trait because event sources
//!   differ fundamentally across platforms.
//!
//! # Crate boundaries
//!
//! `easel_core` owns the binding, the pipelines, dispatching, and this
//! contract module. Backend crates depend on `easel_core` and provide
//! platform glue. Application code depends on both and wires them together.

use crate::error::SurfaceError;
use crate::geometry::SurfaceSize;
use crate::graphics::DrawTarget;
use crate::image::{PixelBuffer, PixelFormat};

/// A chain of presentation buffers for one attached surface.
///
/// # Paint loop
///
/// The paint pipeline drives a chain like this:
///
/// ```rust,ignore
/// loop {
///     loop {
///         let target = chain.draw_target()?;
///         // bind, reset, listener.on_paint(.., false), release
///         if !chain.contents_restored() {
///             break;
///         }
///     }
///     chain.present()?;
///     if !chain.contents_lost() {
///         break;
///     }
/// }
/// ```
pub trait BufferChain: Send {
    /// Returns a drawing handle for the current back buffer.
    ///
    /// A new handle is requested for every pass; handles are never reused.
    fn draw_target(&mut self) -> Result<Box<dyn DrawTarget>, SurfaceError>;

    /// Whether the back buffer was reallocated since the last
    /// [`draw_target`](Self::draw_target), invalidating what was drawn.
    fn contents_restored(&mut self) -> bool;

    /// Shows the back buffer.
    fn present(&mut self) -> Result<(), SurfaceError>;

    /// Whether the last [`present`](Self::present) was lost and the frame
    /// has to be rendered again.
    fn contents_lost(&mut self) -> bool;

    /// Adapts the chain to a new surface size.
    fn resize(&mut self, size: SurfaceSize);
}

/// Allocation collaborator of a surface.
pub trait SurfaceBackend: Send + Sync {
    /// Creates a chain of `buffers` (at least two) buffers for a surface that
    /// just attached.
    fn create_buffer_chain(
        &self,
        size: SurfaceSize,
        buffers: u32,
    ) -> Result<Box<dyn BufferChain>, SurfaceError>;

    /// Allocates an offscreen image for a snapshot.
    fn create_image(
        &self,
        size: SurfaceSize,
        format: PixelFormat,
    ) -> Result<PixelBuffer, SurfaceError> {
        match format {
            PixelFormat::Rgba8888 => PixelBuffer::try_new(size),
        }
    }
}
