// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each led by a one-byte tag.
//! [`decode`] reads them back as an iterator of [`RecordedEvent`].

use easel_core::binding::Epoch;
use easel_core::geometry::{SurfaceId, SurfaceSize};
use easel_core::time::HostTime;
use easel_core::trace::{
    DropReason, DroppedEvent, FrameEvent, FrameOutcome, LifecycleEvent, LifecycleKind,
    PaintPassEvent, PresentEvent, RequestKind, SnapshotEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_LIFECYCLE: u8 = 1;
const TAG_PAINT_PASS: u8 = 2;
const TAG_PRESENT: u8 = 3;
const TAG_FRAME: u8 = 4;
const TAG_SNAPSHOT: u8 = 5;
const TAG_DROPPED: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_head(&mut self, tag: u8, surface: SurfaceId) {
        self.write_u8(tag);
        self.write_u32(surface.0);
    }

    fn write_size(&mut self, size: SurfaceSize) {
        self.write_u32(size.width);
        self.write_u32(size.height);
    }
}

impl TraceSink for RecorderSink {
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.write_head(TAG_LIFECYCLE, e.surface);
        self.write_u8(match e.kind {
            LifecycleKind::Attach => 0,
            LifecycleKind::Resize => 1,
            LifecycleKind::Detach => 2,
            LifecycleKind::Clear => 3,
        });
        self.write_size(e.size);
        self.write_u64(e.epoch.0);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_paint_pass(&mut self, e: &PaintPassEvent) {
        self.write_head(TAG_PAINT_PASS, e.surface);
        self.write_u64(e.frame_index);
        self.write_u32(e.pass);
        self.write_u8(u8::from(e.restored));
        self.write_u64(e.timestamp.ticks());
    }

    fn on_present(&mut self, e: &PresentEvent) {
        self.write_head(TAG_PRESENT, e.surface);
        self.write_u64(e.frame_index);
        self.write_u32(e.attempt);
        self.write_u8(u8::from(e.lost));
        self.write_u64(e.timestamp.ticks());
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_head(TAG_FRAME, e.surface);
        self.write_u64(e.frame_index);
        self.write_u32(e.paint_passes);
        self.write_u32(e.presents);
        self.write_u8(match e.outcome {
            FrameOutcome::Presented => 0,
            FrameOutcome::PaintCapped => 1,
            FrameOutcome::Abandoned => 2,
        });
        self.write_u64(e.started.ticks());
        self.write_u64(e.finished.ticks());
    }

    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        self.write_head(TAG_SNAPSHOT, e.surface);
        self.write_size(e.size);
        self.write_u64(e.started.ticks());
        self.write_u64(e.finished.ticks());
    }

    fn on_dropped(&mut self, e: &DroppedEvent) {
        self.write_head(TAG_DROPPED, e.surface);
        self.write_u8(match e.request {
            RequestKind::Paint => 0,
            RequestKind::Snapshot => 1,
        });
        self.write_u8(match e.reason {
            DropReason::Unbound => 0,
            DropReason::Failed => 1,
            DropReason::Shutdown => 2,
        });
        self.write_u64(e.timestamp.ticks());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`PaintPassEvent`].
    PaintPass(PaintPassEvent),
    /// A [`PresentEvent`].
    Present(PresentEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`SnapshotEvent`].
    Snapshot(SnapshotEvent),
    /// A [`DroppedEvent`].
    Dropped(DroppedEvent),
}

impl RecordedEvent {
    /// Feeds this event to `sink` as if it were emitted live.
    pub fn replay(&self, sink: &mut dyn TraceSink) {
        match self {
            Self::Lifecycle(e) => sink.on_lifecycle(e),
            Self::PaintPass(e) => sink.on_paint_pass(e),
            Self::Present(e) => sink.on_present(e),
            Self::Frame(e) => sink.on_frame(e),
            Self::Snapshot(e) => sink.on_snapshot(e),
            Self::Dropped(e) => sink.on_dropped(e),
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_size(&mut self) -> Option<SurfaceSize> {
        Some(SurfaceSize::new(self.read_u32()?, self.read_u32()?))
    }

    fn read_lifecycle_kind(&mut self) -> Option<LifecycleKind> {
        Some(match self.read_u8()? {
            0 => LifecycleKind::Attach,
            1 => LifecycleKind::Resize,
            2 => LifecycleKind::Detach,
            _ => LifecycleKind::Clear,
        })
    }

    fn read_outcome(&mut self) -> Option<FrameOutcome> {
        Some(match self.read_u8()? {
            0 => FrameOutcome::Presented,
            1 => FrameOutcome::PaintCapped,
            _ => FrameOutcome::Abandoned,
        })
    }

    fn read_request(&mut self) -> Option<RequestKind> {
        Some(match self.read_u8()? {
            0 => RequestKind::Paint,
            _ => RequestKind::Snapshot,
        })
    }

    fn read_reason(&mut self) -> Option<DropReason> {
        Some(match self.read_u8()? {
            0 => DropReason::Unbound,
            1 => DropReason::Failed,
            _ => DropReason::Shutdown,
        })
    }

    fn decode_lifecycle(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            surface,
            kind: self.read_lifecycle_kind()?,
            size: self.read_size()?,
            epoch: Epoch(self.read_u64()?),
            timestamp: self.read_time()?,
        }))
    }

    fn decode_paint_pass(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::PaintPass(PaintPassEvent {
            surface,
            frame_index: self.read_u64()?,
            pass: self.read_u32()?,
            restored: self.read_bool()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_present(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::Present(PresentEvent {
            surface,
            frame_index: self.read_u64()?,
            attempt: self.read_u32()?,
            lost: self.read_bool()?,
            timestamp: self.read_time()?,
        }))
    }

    fn decode_frame(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            surface,
            frame_index: self.read_u64()?,
            paint_passes: self.read_u32()?,
            presents: self.read_u32()?,
            outcome: self.read_outcome()?,
            started: self.read_time()?,
            finished: self.read_time()?,
        }))
    }

    fn decode_snapshot(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::Snapshot(SnapshotEvent {
            surface,
            size: self.read_size()?,
            started: self.read_time()?,
            finished: self.read_time()?,
        }))
    }

    fn decode_dropped(&mut self, surface: SurfaceId) -> Option<RecordedEvent> {
        Some(RecordedEvent::Dropped(DroppedEvent {
            surface,
            request: self.read_request()?,
            reason: self.read_reason()?,
            timestamp: self.read_time()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let surface = SurfaceId(self.read_u32()?);
        match tag {
            TAG_LIFECYCLE => self.decode_lifecycle(surface),
            TAG_PAINT_PASS => self.decode_paint_pass(surface),
            TAG_PRESENT => self.decode_present(surface),
            TAG_FRAME => self.decode_frame(surface),
            TAG_SNAPSHOT => self.decode_snapshot(surface),
            TAG_DROPPED => self.decode_dropped(surface),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> FrameEvent {
        FrameEvent {
            surface: SurfaceId(2),
            frame_index: 7,
            paint_passes: 3,
            presents: 2,
            outcome: FrameOutcome::PaintCapped,
            started: HostTime(1_000),
            finished: HostTime(4_500),
        }
    }

    fn lifecycle() -> LifecycleEvent {
        LifecycleEvent {
            surface: SurfaceId(2),
            kind: LifecycleKind::Resize,
            size: SurfaceSize::new(400, 300),
            epoch: Epoch(9),
            timestamp: HostTime(500),
        }
    }

    #[test]
    fn frame_loop_sequence_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_lifecycle(&lifecycle());
        rec.on_paint_pass(&PaintPassEvent {
            surface: SurfaceId(2),
            frame_index: 7,
            pass: 1,
            restored: true,
            timestamp: HostTime(1_200),
        });
        rec.on_present(&PresentEvent {
            surface: SurfaceId(2),
            frame_index: 7,
            attempt: 1,
            lost: true,
            timestamp: HostTime(1_400),
        });
        rec.on_frame(&frame());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert_eq!(events[0], RecordedEvent::Lifecycle(lifecycle()));
        match events[1] {
            RecordedEvent::PaintPass(e) => {
                assert_eq!(e.pass, 1);
                assert!(e.restored);
            }
            other => panic!("expected PaintPass, got {other:?}"),
        }
        match events[2] {
            RecordedEvent::Present(e) => {
                assert_eq!(e.attempt, 1);
                assert!(e.lost);
                assert_eq!(e.timestamp, HostTime(1_400));
            }
            other => panic!("expected Present, got {other:?}"),
        }
        assert_eq!(events[3], RecordedEvent::Frame(frame()));
    }

    #[test]
    fn snapshot_and_dropped_keep_their_fields() {
        let mut rec = RecorderSink::new();
        let snapshot = SnapshotEvent {
            surface: SurfaceId(1),
            size: SurfaceSize::new(800, 600),
            started: HostTime(10),
            finished: HostTime(90),
        };
        let dropped = DroppedEvent {
            surface: SurfaceId(1),
            request: RequestKind::Paint,
            reason: DropReason::Shutdown,
            timestamp: HostTime(100),
        };
        rec.on_snapshot(&snapshot);
        rec.on_dropped(&dropped);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Snapshot(snapshot),
                RecordedEvent::Dropped(dropped)
            ]
        );
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&frame());
        rec.on_frame(&frame());
        let bytes = rec.into_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events, [RecordedEvent::Frame(frame())]);
    }

    #[test]
    fn unknown_tag_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&frame());
        let mut bytes = rec.into_bytes();
        bytes.extend_from_slice(&[0xff, 0, 0, 0, 0]);

        assert_eq!(decode(&bytes).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        assert_eq!(decode(&[]).count(), 0);
    }

    #[test]
    fn replay_feeds_another_sink() {
        let mut first = RecorderSink::new();
        first.on_lifecycle(&lifecycle());
        first.on_frame(&frame());

        let mut second = RecorderSink::new();
        for event in decode(first.as_bytes()) {
            event.replay(&mut second);
        }
        assert_eq!(first.as_bytes(), second.as_bytes());

        second.clear();
        assert!(second.as_bytes().is_empty());
    }
}
