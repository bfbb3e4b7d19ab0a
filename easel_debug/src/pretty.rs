// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].

use std::io::Write;

use easel_core::time::{HostTime, Timebase};
use easel_core::trace::{
    DropReason, DroppedEvent, FrameEvent, FrameOutcome, LifecycleEvent, LifecycleKind,
    PaintPassEvent, PresentEvent, RequestKind, SnapshotEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write + Send>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
            timebase,
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn host_us(&self, t: HostTime) -> f64 {
        t.to_nanos(self.timebase) as f64 / 1000.0
    }

    fn span_us(&self, start: HostTime, end: HostTime) -> f64 {
        self.host_us(end) - self.host_us(start)
    }
}

fn lifecycle_name(kind: LifecycleKind) -> &'static str {
    match kind {
        LifecycleKind::Attach => "attach",
        LifecycleKind::Resize => "resize",
        LifecycleKind::Detach => "detach",
        LifecycleKind::Clear => "clear",
    }
}

fn outcome_name(outcome: FrameOutcome) -> &'static str {
    match outcome {
        FrameOutcome::Presented => "presented",
        FrameOutcome::PaintCapped => "PAINT-CAPPED",
        FrameOutcome::Abandoned => "ABANDONED",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] surface={} {}x{} epoch={} at {:.1}µs",
            lifecycle_name(e.kind),
            e.surface.0,
            e.size.width,
            e.size.height,
            e.epoch.0,
            self.host_us(e.timestamp),
        );
    }

    fn on_paint_pass(&mut self, e: &PaintPassEvent) {
        let restored = if e.restored { " restored" } else { "" };
        let _ = writeln!(
            self.writer,
            "[paint] surface={} frame={} pass={}{restored} at {:.1}µs",
            e.surface.0,
            e.frame_index,
            e.pass,
            self.host_us(e.timestamp),
        );
    }

    fn on_present(&mut self, e: &PresentEvent) {
        let lost = if e.lost { " lost" } else { "" };
        let _ = writeln!(
            self.writer,
            "[present] surface={} frame={} attempt={}{lost} at {:.1}µs",
            e.surface.0,
            e.frame_index,
            e.attempt,
            self.host_us(e.timestamp),
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] surface={} frame={} passes={} presents={} {} in {:.1}µs",
            e.surface.0,
            e.frame_index,
            e.paint_passes,
            e.presents,
            outcome_name(e.outcome),
            self.span_us(e.started, e.finished),
        );
    }

    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        let _ = writeln!(
            self.writer,
            "[snapshot] surface={} {}x{} in {:.1}µs",
            e.surface.0,
            e.size.width,
            e.size.height,
            self.span_us(e.started, e.finished),
        );
    }

    fn on_dropped(&mut self, e: &DroppedEvent) {
        let request = match e.request {
            RequestKind::Paint => "paint",
            RequestKind::Snapshot => "snapshot",
        };
        let reason = match e.reason {
            DropReason::Unbound => "unbound",
            DropReason::Failed => "failed",
            DropReason::Shutdown => "shutdown",
        };
        let _ = writeln!(
            self.writer,
            "[dropped] surface={} {request} ({reason}) at {:.1}µs",
            e.surface.0,
            self.host_us(e.timestamp),
        );
    }
}
