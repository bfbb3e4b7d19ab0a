// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Frames and snapshots become complete (`"X"`) slices; paint passes,
//! presents, lifecycle changes, and dropped requests become instants. Each
//! surface is its own track (`tid`).
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use easel_core::time::{HostTime, Timebase};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let us = |t: HostTime| t.to_nanos(timebase) as f64 / 1000.0;
    let mut events: Vec<Value> = Vec::new();

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Lifecycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.kind),
                    "cat": "Lifecycle",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": e.surface.0,
                    "s": "t",
                    "args": {
                        "width": e.size.width,
                        "height": e.size.height,
                        "epoch": e.epoch.0,
                    }
                }));
            }
            RecordedEvent::PaintPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "PaintPass",
                    "cat": "Frame",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": e.surface.0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "pass": e.pass,
                        "restored": e.restored,
                    }
                }));
            }
            RecordedEvent::Present(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Present",
                    "cat": "Frame",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": e.surface.0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "attempt": e.attempt,
                        "lost": e.lost,
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": us(e.started),
                    "dur": us(e.finished) - us(e.started),
                    "pid": 0,
                    "tid": e.surface.0,
                    "args": {
                        "frame_index": e.frame_index,
                        "paint_passes": e.paint_passes,
                        "presents": e.presents,
                        "outcome": format!("{:?}", e.outcome),
                    }
                }));
            }
            RecordedEvent::Snapshot(e) => {
                events.push(json!({
                    "ph": "X",
                    "name": "Snapshot",
                    "cat": "Snapshot",
                    "ts": us(e.started),
                    "dur": us(e.finished) - us(e.started),
                    "pid": 0,
                    "tid": e.surface.0,
                    "args": {
                        "width": e.size.width,
                        "height": e.size.height,
                    }
                }));
            }
            RecordedEvent::Dropped(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("Dropped{:?}", e.request),
                    "cat": "Dropped",
                    "ts": us(e.timestamp),
                    "pid": 0,
                    "tid": e.surface.0,
                    "s": "t",
                    "args": {
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use easel_core::binding::Epoch;
    use easel_core::geometry::{SurfaceId, SurfaceSize};
    use easel_core::trace::{
        FrameEvent, FrameOutcome, LifecycleEvent, LifecycleKind, PresentEvent, TraceSink,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(&LifecycleEvent {
            surface: SurfaceId(3),
            kind: LifecycleKind::Attach,
            size: SurfaceSize::new(800, 600),
            epoch: Epoch(1),
            timestamp: HostTime(1_000),
        });
        rec.on_present(&PresentEvent {
            surface: SurfaceId(3),
            frame_index: 1,
            attempt: 1,
            lost: false,
            timestamp: HostTime(2_000),
        });
        rec.on_frame(&FrameEvent {
            surface: SurfaceId(3),
            frame_index: 1,
            paint_passes: 1,
            presents: 1,
            outcome: FrameOutcome::Presented,
            started: HostTime(1_500),
            finished: HostTime(2_500),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "Attach");
        assert_eq!(parsed[0]["tid"], 3);
        assert_eq!(parsed[0]["args"]["width"], 800);

        assert_eq!(parsed[1]["name"], "Present");
        assert_eq!(parsed[1]["ts"], 2.0);

        assert_eq!(parsed[2]["ph"], "X");
        assert_eq!(parsed[2]["ts"], 1.5);
        assert_eq!(parsed[2]["dur"], 1.0);
        assert_eq!(parsed[2]["args"]["outcome"], "Presented");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
