// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for easel diagnostics.
//!
//! This crate provides [`TraceSink`](easel_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! A context owns its sink once installed. Wrap a sink in [`SharedSink`] to
//! keep a handle for reading it back afterwards.

pub mod chrome;
pub mod pretty;
pub mod recorder;

use std::sync::Arc;

use easel_core::trace::{
    DroppedEvent, FrameEvent, LifecycleEvent, PaintPassEvent, PresentEvent, SnapshotEvent,
    TraceSink,
};
use parking_lot::{Mutex, MutexGuard};

/// A [`TraceSink`] behind a shared lock.
///
/// Clones forward to the same sink.
#[derive(Debug, Default)]
pub struct SharedSink<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SharedSink<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TraceSink> SharedSink<S> {
    /// Wraps `sink`.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sink)),
        }
    }

    /// Locks the wrapped sink.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }
}

impl<S: TraceSink> TraceSink for SharedSink<S> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.inner.lock().on_lifecycle(e);
    }

    fn on_paint_pass(&mut self, e: &PaintPassEvent) {
        self.inner.lock().on_paint_pass(e);
    }

    fn on_present(&mut self, e: &PresentEvent) {
        self.inner.lock().on_present(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.inner.lock().on_frame(e);
    }

    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        self.inner.lock().on_snapshot(e);
    }

    fn on_dropped(&mut self, e: &DroppedEvent) {
        self.inner.lock().on_dropped(e);
    }
}
