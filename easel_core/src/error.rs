// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by backends and the pipelines.

use core::fmt;

use crate::geometry::SurfaceSize;

/// Errors raised by surface backends.
///
/// None of these reach the listener. A failing paint or snapshot request is
/// abandoned; a failing attach leaves the surface unbound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    /// The backend could not create a buffer chain.
    ChainAllocation {
        /// Requested surface size.
        size: SurfaceSize,
        /// Requested number of buffers.
        buffers: u32,
    },
    /// The backend could not allocate an offscreen image.
    ImageAllocation(SurfaceSize),
    /// An image or buffer was requested for a zero-area surface.
    EmptySurface,
    /// The buffer chain could not hand out a drawing target.
    Acquire(String),
    /// The buffer chain failed to present.
    Present(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChainAllocation { size, buffers } => write!(
                f,
                "failed to allocate a {buffers}-buffer chain of {}x{}",
                size.width, size.height
            ),
            Self::ImageAllocation(size) => write!(
                f,
                "failed to allocate a {}x{} offscreen image",
                size.width, size.height
            ),
            Self::EmptySurface => f.write_str("surface has zero area"),
            Self::Acquire(reason) => write!(f, "back buffer acquisition failed: {reason}"),
            Self::Present(reason) => write!(f, "presentation failed: {reason}"),
        }
    }
}

impl core::error::Error for SurfaceError {}
