// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU backend for easel.
//!
//! [`SoftwareBackend`] simulates one display. It hands out
//! [`SoftwareBufferChain`]s of RGBA back buffers whose `present` copies into
//! the display's front buffer, and allocates snapshot images on the heap.
//!
//! Buffer invalidations are scripted: queue an [`InvalidationScript`] to make
//! upcoming `contents_restored` / `contents_lost` queries answer `true`. The
//! display keeps a bounded [`PresentHistory`] and counters so callers can see
//! exactly what reached the screen.
//!
//! ```rust,ignore
//! let backend = SoftwareBackend::new();
//! backend.script(InvalidationScript::new().restored(&[true, true]));
//! let context = Context::new(Arc::new(backend.clone()), dispatcher.handle(), config);
//! context.surface().attach(SurfaceSize::new(800, 600));
//! context.request_paint();
//! dispatcher.flush();
//! assert_eq!(backend.acquire_count(), 3);
//! ```

mod chain;
mod display;
mod queue;

pub use chain::SoftwareBufferChain;
pub use display::{
    DEFAULT_HISTORY_CAPACITY, InvalidationScript, PresentHistory, PresentRecord, SoftwareBackend,
};
