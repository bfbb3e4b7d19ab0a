// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The snapshot pipeline: one paint pass into an offscreen image.
//!
//! The image is allocated through the
//! [`SurfaceBackend`](crate::backend::SurfaceBackend) at the binding's size,
//! cleared to the configured background, and bound into the surface's own
//! graphics context. The buffer chain is never touched, so the presented
//! frame stays as it was.

use crate::binding::Binding;
use crate::context::Context;
use crate::error::SurfaceError;
use crate::image::{Bitmap, PixelFormat, SharedPixelBuffer};
use crate::listener::ContextListener;
use crate::time;
use crate::trace::SnapshotEvent;

/// Renders a snapshot image. Must be called with the binding locked.
pub(crate) fn render_snapshot(
    context: &Context,
    binding: &mut Binding,
    listener: Option<&dyn ContextListener>,
) -> Result<Bitmap, SurfaceError> {
    let started = time::now();
    let size = binding.graphics().size();

    let mut image = context.backend().create_image(size, PixelFormat::Rgba8888)?;
    image.clear(context.config().background);
    let image = SharedPixelBuffer::new(image);

    {
        let mut bound = binding.graphics_mut().bind(Box::new(image.clone()));
        bound.reset();
        if let Some(listener) = listener {
            listener.on_paint(context, &mut bound, true);
        }
    }

    let bitmap = image.into_bitmap();
    context.trace().snapshot(&SnapshotEvent {
        surface: context.id(),
        size,
        started,
        finished: time::now(),
    });
    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::SurfaceConfig;
    use crate::dispatch::EventDispatcher;
    use crate::geometry::SurfaceSize;
    use crate::image::Color;
    use crate::testing::{ChainCall, RecordingListener, ScriptedBackend, Seen};

    const RED: Color = Color::from_rgb8(255, 0, 0);

    fn snapshot_of(
        size: SurfaceSize,
        backend: &Arc<ScriptedBackend>,
        listener: &RecordingListener,
    ) -> Result<Bitmap, SurfaceError> {
        let dispatcher = EventDispatcher::spawn().unwrap();
        let config = SurfaceConfig::desktop().with_background(Color::from_rgb8(0, 0, 255));
        let context = Context::new(backend.clone(), dispatcher.handle(), config);
        context.surface().attach(size);
        context
            .binding()
            .with_binding(|b| render_snapshot(&context, b, Some(listener)))
            .unwrap()
    }

    #[test]
    fn snapshot_matches_surface_size_and_skips_chain() {
        let backend = Arc::new(ScriptedBackend::default());
        let listener = RecordingListener::default();
        let bitmap = snapshot_of(SurfaceSize::new(800, 600), &backend, &listener).unwrap();

        assert_eq!(bitmap.size(), SurfaceSize::new(800, 600));
        assert_eq!(bitmap.format(), PixelFormat::Rgba8888);
        assert_eq!(
            listener.seen(),
            [Seen::Paint {
                size: SurfaceSize::new(800, 600),
                snapshot: true
            }]
        );
        assert_eq!(backend.probe.count(ChainCall::Acquire), 0);
        assert_eq!(backend.probe.count(ChainCall::Present), 0);
    }

    #[test]
    fn snapshot_starts_from_background() {
        let backend = Arc::new(ScriptedBackend::default());
        let listener = RecordingListener::default();
        let bitmap = snapshot_of(SurfaceSize::new(4, 4), &backend, &listener).unwrap();
        assert_eq!(bitmap.pixel(3, 3), Some(Color::from_rgb8(0, 0, 255)));
    }

    #[test]
    fn snapshot_captures_listener_drawing() {
        let backend = Arc::new(ScriptedBackend::default());
        let listener = RecordingListener::default();
        *listener.paint_fill.lock() = Some(RED);
        let bitmap = snapshot_of(SurfaceSize::new(4, 4), &backend, &listener).unwrap();
        assert_eq!(bitmap.pixel(0, 0), Some(RED));
        assert_eq!(bitmap.pixel(3, 3), Some(RED));
    }

    #[test]
    fn allocation_failure_skips_listener() {
        let backend = Arc::new(ScriptedBackend::default());
        *backend.fail_image.lock() = true;
        let listener = RecordingListener::default();
        let result = snapshot_of(SurfaceSize::new(4, 4), &backend, &listener);
        assert_eq!(result, Err(SurfaceError::ImageAllocation(SurfaceSize::new(4, 4))));
        assert!(listener.seen().is_empty());
    }

    #[test]
    fn empty_surface_is_rejected() {
        let backend = Arc::new(ScriptedBackend::default());
        let listener = RecordingListener::default();
        let result = snapshot_of(SurfaceSize::new(0, 10), &backend, &listener);
        assert_eq!(result, Err(SurfaceError::EmptySurface));
    }
}
