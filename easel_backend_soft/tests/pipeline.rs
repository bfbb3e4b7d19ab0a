// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of a context on the software backend.

use std::sync::Arc;

use easel_backend_soft::{InvalidationScript, SoftwareBackend};
use easel_core::config::SurfaceConfig;
use easel_core::context::Context;
use easel_core::dispatch::EventDispatcher;
use easel_core::geometry::SurfaceSize;
use easel_core::graphics::Graphics;
use easel_core::image::{Bitmap, Color};
use easel_core::listener::ContextListener;
use kurbo::Rect;
use parking_lot::Mutex;

const RED: Color = Color::from_rgb8(255, 0, 0);
const BLUE: Color = Color::from_rgb8(0, 0, 255);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Event {
    Create,
    Dispose(Option<SurfaceSize>),
    Resize(u32, u32),
    Paint(SurfaceSize),
    SnapshotPaint(SurfaceSize),
    Snapshot(SurfaceSize),
}

/// Paints the live surface red and snapshots blue, top-left 10x10 only.
#[derive(Debug, Default)]
struct Painter {
    events: Mutex<Vec<Event>>,
    snapshots: Mutex<Vec<Bitmap>>,
}

impl Painter {
    fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    fn live_paints(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, Event::Paint(_)))
            .count()
    }
}

impl ContextListener for Painter {
    fn on_create(&self, _: &Context) {
        self.events.lock().push(Event::Create);
    }

    fn on_dispose(&self, context: &Context) {
        let size = context.graphics().and_then(|g| g.size());
        self.events.lock().push(Event::Dispose(size));
    }

    fn on_resize(&self, _: &Context, width: u32, height: u32) {
        self.events.lock().push(Event::Resize(width, height));
    }

    fn on_paint(&self, _: &Context, graphics: &mut Graphics, snapshot: bool) {
        if snapshot {
            graphics.set_color(BLUE);
            graphics.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
            self.events.lock().push(Event::SnapshotPaint(graphics.size()));
        } else {
            graphics.set_color(RED);
            graphics.fill_rect(graphics.size().to_rect());
            self.events.lock().push(Event::Paint(graphics.size()));
        }
    }

    fn on_snapshot(&self, _: &Context, snapshot: Bitmap) {
        self.events.lock().push(Event::Snapshot(snapshot.size()));
        self.snapshots.lock().push(snapshot);
    }
}

struct Harness {
    dispatcher: EventDispatcher,
    backend: SoftwareBackend,
    painter: Arc<Painter>,
    context: Context,
}

impl Harness {
    fn new() -> Self {
        let dispatcher = EventDispatcher::spawn().unwrap();
        let backend = SoftwareBackend::new();
        let painter = Arc::new(Painter::default());
        let context = Context::new(
            Arc::new(backend.clone()),
            dispatcher.handle(),
            SurfaceConfig::strict().with_background(Color::WHITE),
        );
        context.set_listener(Some(painter.clone()));
        Self {
            dispatcher,
            backend,
            painter,
            context,
        }
    }

    /// Waits for the queue, including tasks queued by tasks.
    fn settle(&self) {
        assert!(self.dispatcher.flush());
        assert!(self.dispatcher.flush());
    }
}

#[test]
fn graphics_exists_only_between_create_and_clear() {
    let h = Harness::new();
    assert!(h.context.graphics().is_none());

    h.context.surface().attach(SurfaceSize::new(800, 600));
    let graphics = h.context.graphics().unwrap();
    assert_eq!(graphics.size(), Some(SurfaceSize::new(800, 600)));

    h.context.surface().detach();
    h.settle();
    assert!(h.context.graphics().is_none());
    assert_eq!(graphics.size(), None);
    assert_eq!(
        h.painter.events(),
        [
            Event::Create,
            Event::Dispose(Some(SurfaceSize::new(800, 600)))
        ]
    );
}

#[test]
fn requests_while_detached_do_nothing() {
    let h = Harness::new();
    h.context.request_paint();
    h.context.request_snapshot();
    h.settle();

    assert!(h.painter.events().is_empty());
    assert_eq!(h.backend.acquire_count(), 0);
    assert!(h.backend.front_buffer().is_none());

    h.context.surface().attach(SurfaceSize::new(4, 4));
    h.context.surface().detach();
    h.settle();
    h.context.request_paint();
    h.settle();
    assert_eq!(h.painter.live_paints(), 0);
}

#[test]
fn create_precedes_paint_and_dispose_precedes_clear() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(8, 8));
    h.context.request_paint();
    h.context.surface().detach();
    h.context.request_paint();
    h.settle();

    assert_eq!(
        h.painter.events(),
        [
            Event::Create,
            Event::Paint(SurfaceSize::new(8, 8)),
            Event::Dispose(Some(SurfaceSize::new(8, 8))),
        ]
    );
    assert_eq!(h.backend.present_count(), 1);
}

#[test]
fn restored_twice_paints_three_times_then_presents_once() {
    let h = Harness::new();
    h.backend
        .script(InvalidationScript::new().restored(&[true, true, false]));
    h.context.surface().attach(SurfaceSize::new(16, 16));
    h.context.request_paint();
    h.settle();

    assert_eq!(h.painter.live_paints(), 3);
    assert_eq!(h.backend.acquire_count(), 3);
    assert_eq!(h.backend.present_count(), 1);
    assert_eq!(h.backend.front_buffer().unwrap().pixel(15, 15), Some(RED));
}

#[test]
fn lost_once_repeats_render_and_present_once() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(16, 16));
    h.context.request_paint();
    h.settle();

    h.backend.script(InvalidationScript::new().lost(&[true, false]));
    h.context.request_paint();
    h.settle();

    assert_eq!(h.painter.live_paints(), 3);
    assert_eq!(h.backend.present_count(), 3);
    let history = h.backend.history();
    let discarded: Vec<bool> = history.records.iter().map(|r| r.discarded).collect();
    assert_eq!(discarded, [false, true, false]);
    assert_eq!(h.backend.front_buffer().unwrap().pixel(0, 0), Some(RED));
}

#[test]
fn resize_is_seen_by_the_next_paint() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(800, 600));
    h.context.request_paint();
    h.settle();

    h.context.surface().resize(SurfaceSize::new(400, 300));
    h.context.request_paint();
    h.settle();

    assert_eq!(
        h.painter.events(),
        [
            Event::Create,
            Event::Paint(SurfaceSize::new(800, 600)),
            Event::Resize(400, 300),
            Event::Paint(SurfaceSize::new(400, 300)),
        ]
    );
    assert_eq!(
        h.backend.front_buffer().unwrap().size(),
        SurfaceSize::new(400, 300)
    );
}

#[test]
fn snapshot_leaves_front_buffer_untouched() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(800, 600));
    h.context.request_paint();
    h.settle();
    let before = h.backend.front_buffer().unwrap();
    let presents = h.backend.present_count();
    let acquires = h.backend.acquire_count();

    h.context.request_snapshot();
    h.settle();

    assert_eq!(h.backend.front_buffer().unwrap(), before);
    assert_eq!(h.backend.present_count(), presents);
    assert_eq!(h.backend.acquire_count(), acquires);

    let snapshots = h.painter.snapshots.lock();
    let [image] = snapshots.as_slice() else {
        panic!("expected one snapshot, got {}", snapshots.len());
    };
    assert_eq!(image.size(), SurfaceSize::new(800, 600));
    assert_eq!(image.pixel(0, 0), Some(BLUE));
    assert_eq!(image.pixel(10, 10), Some(Color::WHITE));
    assert_eq!(
        h.painter.events()[2..],
        [
            Event::SnapshotPaint(SurfaceSize::new(800, 600)),
            Event::Snapshot(SurfaceSize::new(800, 600)),
        ]
    );
}

#[test]
fn failed_snapshot_allocation_delivers_nothing() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(4, 4));
    h.backend.fail_image_allocation(true);
    h.context.request_snapshot();
    h.settle();

    assert_eq!(h.painter.events(), [Event::Create]);
}

#[test]
fn failed_chain_allocation_leaves_surface_unbound() {
    let h = Harness::new();
    h.backend.fail_chain_allocation(true);
    h.context.surface().attach(SurfaceSize::new(4, 4));
    h.context.request_paint();
    h.settle();

    assert!(h.context.graphics().is_none());
    assert!(h.painter.events().is_empty());
    assert_eq!(h.backend.acquire_count(), 0);
}

#[test]
fn requests_from_many_threads_all_render() {
    let h = Harness::new();
    h.context.surface().attach(SurfaceSize::new(2, 2));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let context = h.context.clone();
            scope.spawn(move || {
                for _ in 0..25 {
                    context.request_paint();
                }
            });
        }
    });
    h.settle();

    assert_eq!(h.painter.live_paints(), 100);
    assert_eq!(h.backend.present_count(), 100);
}
