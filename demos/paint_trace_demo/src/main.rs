// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drives one software surface through its whole lifecycle with tracing on.
//!
//! Attaches an 800x600 surface, paints, resizes, snapshots, injects buffer
//! invalidations, and detaches. Every trace event is recorded with a
//! [`RecorderSink`](easel_debug::recorder::RecorderSink), replayed through a
//! [`PrettyPrintSink`](easel_debug::pretty::PrettyPrintSink) to stdout, and
//! exported as Chrome trace JSON (first argument, default `easel_trace.json`).
//!
//! Set `RUST_LOG=debug` to see the core's log output as well.

use std::fs::File;
use std::io::{self, BufWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use easel_backend_soft::{InvalidationScript, SoftwareBackend};
use easel_core::config::{RetryLimits, SurfaceConfig};
use easel_core::context::Context;
use easel_core::dispatch::EventDispatcher;
use easel_core::geometry::SurfaceSize;
use easel_core::graphics::Graphics;
use easel_core::image::{Bitmap, Color};
use easel_core::input::{InputEvent, Modifiers, PointerButton, PointerEvent};
use easel_core::listener::ContextListener;
use easel_core::time::Timebase;
use easel_debug::SharedSink;
use easel_debug::pretty::PrettyPrintSink;
use easel_debug::recorder::{RecorderSink, decode};
use kurbo::Rect;

const STRIPES: [Color; 3] = [
    Color::from_rgb8(0xd0, 0x40, 0x40),
    Color::from_rgb8(0x40, 0xa0, 0x40),
    Color::from_rgb8(0x40, 0x60, 0xd0),
];

/// Paints vertical stripes, shifting one stripe per frame.
#[derive(Debug, Default)]
struct Stripes {
    frame: AtomicU32,
}

impl ContextListener for Stripes {
    fn on_create(&self, context: &Context) {
        log::info!("surface {:?} created", context.id());
    }

    fn on_dispose(&self, context: &Context) {
        log::info!("surface {:?} disposed", context.id());
    }

    fn on_resize(&self, _: &Context, width: u32, height: u32) {
        log::info!("resized to {width}x{height}");
    }

    fn on_paint(&self, _: &Context, graphics: &mut Graphics, snapshot: bool) {
        let shift = if snapshot {
            0
        } else {
            self.frame.fetch_add(1, Ordering::Relaxed) as usize
        };
        let stripe = f64::from(graphics.width()) / STRIPES.len() as f64;
        let height = f64::from(graphics.height());
        for (i, _) in STRIPES.iter().enumerate() {
            graphics.set_color(STRIPES[(i + shift) % STRIPES.len()]);
            let x0 = stripe * i as f64;
            graphics.fill_rect(Rect::new(x0, 0.0, x0 + stripe, height));
        }
    }

    fn on_snapshot(&self, _: &Context, snapshot: Bitmap) {
        log::info!(
            "snapshot {}x{}, top-left {:?}",
            snapshot.width(),
            snapshot.height(),
            snapshot.pixel(0, 0)
        );
    }

    fn on_input(&self, _: &Context, event: &InputEvent) -> bool {
        log::info!("input at {:?}", event.position());
        true
    }
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "easel_trace.json".to_owned());

    // -- setup -------------------------------------------------------------
    let mut dispatcher = EventDispatcher::spawn()?;
    let backend = SoftwareBackend::new();
    let config = SurfaceConfig::desktop().with_retry(RetryLimits {
        max_paint_passes: Some(4),
        max_present_passes: Some(4),
    });
    let context = Context::new(Arc::new(backend.clone()), dispatcher.handle(), config);
    context.set_listener(Some(Arc::new(Stripes::default())));

    let recorder = SharedSink::new(RecorderSink::new());
    context.set_trace_sink(Some(Box::new(recorder.clone())));

    // -- lifecycle ---------------------------------------------------------
    let surface = context.surface();
    surface.attach(SurfaceSize::new(800, 600));
    surface.show();
    context.request_paint();
    dispatcher.flush();

    surface.input(InputEvent::PointerClick(PointerEvent {
        x: 12.0,
        y: 34.0,
        modifiers: Modifiers::empty(),
        id: 0,
        button: Some(PointerButton::Primary),
    }));

    surface.resize(SurfaceSize::new(400, 300));
    context.request_paint();
    context.request_snapshot();
    dispatcher.flush();

    // Two restores, then one lost present.
    backend.script(
        InvalidationScript::new()
            .restored(&[true, true])
            .lost(&[true]),
    );
    context.request_paint();
    dispatcher.flush();

    // More restores than the cap allows.
    backend.script(InvalidationScript::new().restored(&[true; 6]));
    context.request_paint();
    dispatcher.flush();

    surface.hide();
    surface.detach();
    context.request_paint();
    dispatcher.flush();
    dispatcher.flush();
    dispatcher.shutdown();

    let history = backend.history();
    log::info!(
        "{} presents ({} kept), {} acquires",
        backend.present_count(),
        history.kept().count(),
        backend.acquire_count()
    );

    // -- output ------------------------------------------------------------
    let bytes = recorder.lock().as_bytes().to_vec();
    let mut pretty = PrettyPrintSink::new(Box::new(io::stdout()), Timebase::NANOS);
    for event in decode(&bytes) {
        event.replay(&mut pretty);
    }

    let mut writer = BufWriter::new(File::create(&path)?);
    easel_debug::chrome::export(&bytes, Timebase::NANOS, &mut writer)?;
    println!("Wrote {path}");
    Ok(())
}
