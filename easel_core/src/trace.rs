// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the surface lifecycle and paint loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! pipelines call at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`TraceSlot`] holds the optional sink of one [`Context`]. When the `trace`
//! feature is **off**, every `TraceSlot` method compiles to nothing and an
//! installed sink is dropped immediately. When **on**, each method takes the
//! slot's lock and performs a single `Option` branch before dispatching.
//!
//! Events are emitted on the dispatch thread, except for [`LifecycleEvent`]s,
//! which are emitted on the thread delivering the surface signal.
//!
//! # Crate features
//!
//! - `trace`: enables the `TraceSlot` method bodies.
//!
//! [`Context`]: crate::context::Context

use crate::binding::Epoch;
use crate::geometry::{SurfaceId, SurfaceSize};
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which change happened to a surface's binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleKind {
    /// A buffer chain was allocated and a binding installed.
    Attach,
    /// The bound context was resized in place.
    Resize,
    /// The surface detached; disposal was scheduled.
    Detach,
    /// The binding was cleared.
    Clear,
}

/// How a paint request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FrameOutcome {
    /// The last present was kept.
    Presented,
    /// The paint-pass cap was reached; the last pass was presented anyway.
    PaintCapped,
    /// The present cap was reached; the frame was abandoned.
    Abandoned,
}

/// Which request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// [`Context::request_paint`](crate::context::Context::request_paint).
    Paint,
    /// [`Context::request_snapshot`](crate::context::Context::request_snapshot).
    Snapshot,
}

/// Why a request was dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// No binding was installed.
    Unbound,
    /// Acquisition, presentation, or allocation failed.
    Failed,
    /// The dispatcher was shut down.
    Shutdown,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a surface attaches, resizes, detaches, or loses its binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// What happened.
    pub kind: LifecycleKind,
    /// Surface size after the change.
    pub size: SurfaceSize,
    /// Epoch of the binding affected.
    pub epoch: Epoch,
    /// Host time of the change.
    pub timestamp: HostTime,
}

/// Emitted after each paint pass of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintPassEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// Frame counter.
    pub frame_index: u64,
    /// 1-based pass number within the frame.
    pub pass: u32,
    /// Whether the chain reported its contents restored after the pass.
    pub restored: bool,
    /// Host time at the end of the pass.
    pub timestamp: HostTime,
}

/// Emitted after each present of a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// Frame counter.
    pub frame_index: u64,
    /// 1-based present attempt within the frame.
    pub attempt: u32,
    /// Whether the chain reported the present lost.
    pub lost: bool,
    /// Host time of the present.
    pub timestamp: HostTime,
}

/// Emitted once per paint request that reached the buffer chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// Frame counter.
    pub frame_index: u64,
    /// Paint passes run across all present attempts.
    pub paint_passes: u32,
    /// Presents performed.
    pub presents: u32,
    /// How the frame ended.
    pub outcome: FrameOutcome,
    /// Host time when the frame started.
    pub started: HostTime,
    /// Host time when the frame ended.
    pub finished: HostTime,
}

/// Emitted when a snapshot image was rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// Size of the image.
    pub size: SurfaceSize,
    /// Host time when rendering started.
    pub started: HostTime,
    /// Host time when rendering ended.
    pub finished: HostTime,
}

/// Emitted when a paint or snapshot request did nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DroppedEvent {
    /// Surface the event belongs to.
    pub surface: SurfaceId,
    /// Which request.
    pub request: RequestKind,
    /// Why it was dropped.
    pub reason: DropReason,
    /// Host time of the decision.
    pub timestamp: HostTime,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives surface and paint-loop diagnostic events.
///
/// Every method has a default no-op body.
pub trait TraceSink {
    /// Called when a binding is installed, resized, or cleared.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called after each paint pass.
    fn on_paint_pass(&mut self, e: &PaintPassEvent) {
        _ = e;
    }

    /// Called after each present.
    fn on_present(&mut self, e: &PresentEvent) {
        _ = e;
    }

    /// Called at the end of each frame.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when a snapshot was rendered.
    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        _ = e;
    }

    /// Called when a request was dropped.
    fn on_dropped(&mut self, e: &DroppedEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// TraceSlot
// ---------------------------------------------------------------------------

/// Optional, replaceable [`TraceSink`] shared across threads.
pub struct TraceSlot {
    #[cfg(feature = "trace")]
    sink: parking_lot::Mutex<Option<Box<dyn TraceSink + Send>>>,
}

impl core::fmt::Debug for TraceSlot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TraceSlot")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Default for TraceSlot {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! emit {
    ($(#[$doc:meta])* $name:ident, $event:ty, $method:ident) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = self.sink.lock().as_mut() {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl TraceSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            #[cfg(feature = "trace")]
            sink: parking_lot::Mutex::new(None),
        }
    }

    /// Installs or removes the sink, returning the previous one.
    ///
    /// Without the `trace` feature the sink is dropped and `None` returned.
    pub fn set(
        &self,
        sink: Option<Box<dyn TraceSink + Send>>,
    ) -> Option<Box<dyn TraceSink + Send>> {
        #[cfg(feature = "trace")]
        {
            core::mem::replace(&mut *self.sink.lock(), sink)
        }
        #[cfg(not(feature = "trace"))]
        {
            drop(sink);
            None
        }
    }

    /// Whether events reach a sink.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.lock().is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    emit!(
        /// Emits a [`LifecycleEvent`].
        lifecycle, LifecycleEvent, on_lifecycle
    );
    emit!(
        /// Emits a [`PaintPassEvent`].
        paint_pass, PaintPassEvent, on_paint_pass
    );
    emit!(
        /// Emits a [`PresentEvent`].
        present, PresentEvent, on_present
    );
    emit!(
        /// Emits a [`FrameEvent`].
        frame, FrameEvent, on_frame
    );
    emit!(
        /// Emits a [`SnapshotEvent`].
        snapshot, SnapshotEvent, on_snapshot
    );
    emit!(
        /// Emits a [`DroppedEvent`].
        dropped, DroppedEvent, on_dropped
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
