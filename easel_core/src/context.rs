// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The facade an application holds for one surface.
//!
//! A [`Context`] ties together the surface's [`SurfaceComponent`], its
//! [`GraphicsBinding`], the registered [`ContextListener`], and the
//! [`DispatchHandle`] every notification and render is posted through.
//!
//! # Lifecycle
//!
//! ```text
//! attach ─► chain allocated ─► binding set ─► on_create
//! resize ─► binding resized ─► on_resize(w, h)
//! detach ─► on_dispose ─► binding cleared (same task, epoch-guarded)
//! ```
//!
//! Binding changes happen on the thread delivering the surface signal, under
//! the surface's lifecycle lock, so a paint scheduled after a resize always
//! sees the new size and a detach always sees the binding its attach set. Clearing happens
//! on the dispatch thread right after `on_dispose`, so teardown code still
//! sees the binding and anything queued after the detach finds it gone.
//!
//! Paint and snapshot requests against an unbound surface are dropped
//! silently (and traced).

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::backend::SurfaceBackend;
use crate::binding::{Binding, Epoch, GraphicsBinding};
use crate::config::SurfaceConfig;
use crate::dispatch::DispatchHandle;
use crate::geometry::{SurfaceId, SurfacePosition, SurfaceSize};
use crate::graphics::Graphics;
use crate::input::InputEvent;
use crate::listener::ContextListener;
use crate::paint;
use crate::snapshot;
use crate::surface::{SurfaceComponent, SurfaceHooks};
use crate::time;
use crate::trace::{
    DropReason, DroppedEvent, LifecycleEvent, LifecycleKind, RequestKind, TraceSink, TraceSlot,
};

struct ContextInner {
    id: SurfaceId,
    config: SurfaceConfig,
    backend: Arc<dyn SurfaceBackend>,
    dispatch: DispatchHandle,
    binding: Arc<GraphicsBinding>,
    listener: RwLock<Option<Arc<dyn ContextListener>>>,
    trace: TraceSlot,
    frames: AtomicU64,
    surface: SurfaceComponent,
}

/// Shared handle to one surface and its listener. Cloning is cheap.
#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.inner.id)
            .field("binding", &self.inner.binding)
            .field("surface", &self.inner.surface)
            .field("has_listener", &self.inner.listener.read().is_some())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a context for a detached surface.
    ///
    /// Drive the surface through [`surface`](Self::surface).
    #[must_use]
    pub fn new(
        backend: Arc<dyn SurfaceBackend>,
        dispatch: DispatchHandle,
        config: SurfaceConfig,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<ContextInner>| ContextInner {
            id: SurfaceId::next(),
            config,
            backend,
            dispatch,
            binding: Arc::new(GraphicsBinding::new()),
            listener: RwLock::new(None),
            trace: TraceSlot::new(),
            frames: AtomicU64::new(0),
            surface: SurfaceComponent::new(hooks(weak), config.focus_on_show),
        });
        Self { inner }
    }

    /// Process-unique id of the surface.
    #[inline]
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.inner.id
    }

    /// The configuration this context was created with.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.inner.config
    }

    /// The surface component platform glue reports native signals to.
    #[inline]
    #[must_use]
    pub fn surface(&self) -> &SurfaceComponent {
        &self.inner.surface
    }

    /// Whether a graphics binding is installed. May be stale.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.inner.binding.is_bound()
    }

    /// Registers, replaces, or removes the listener.
    ///
    /// Notifications already queued go to whichever listener is registered
    /// when they run.
    pub fn set_listener(&self, listener: Option<Arc<dyn ContextListener>>) {
        *self.inner.listener.write() = listener;
    }

    /// The registered listener.
    #[must_use]
    pub fn listener(&self) -> Option<Arc<dyn ContextListener>> {
        self.inner.listener.read().clone()
    }

    /// Installs or removes the trace sink, returning the previous one.
    ///
    /// Events are only emitted with the `trace` feature enabled.
    pub fn set_trace_sink(
        &self,
        sink: Option<Box<dyn TraceSink + Send>>,
    ) -> Option<Box<dyn TraceSink + Send>> {
        self.inner.trace.set(sink)
    }

    /// Schedules one frame. Returns immediately.
    ///
    /// Dropped when nothing is bound by the time the frame would render.
    pub fn request_paint(&self) {
        if !self.inner.binding.is_bound() {
            self.dropped(RequestKind::Paint, DropReason::Unbound);
            return;
        }
        let context = self.clone();
        if !self.inner.dispatch.post(move || context.paint_now()) {
            self.dropped(RequestKind::Paint, DropReason::Shutdown);
        }
    }

    /// Schedules one snapshot. Returns immediately.
    ///
    /// The image arrives through
    /// [`ContextListener::on_snapshot`]. Dropped when nothing is bound by
    /// the time the snapshot would render.
    pub fn request_snapshot(&self) {
        if !self.inner.binding.is_bound() {
            self.dropped(RequestKind::Snapshot, DropReason::Unbound);
            return;
        }
        let context = self.clone();
        if !self.inner.dispatch.post(move || context.snapshot_now()) {
            self.dropped(RequestKind::Snapshot, DropReason::Shutdown);
        }
    }

    /// A handle to the current graphics context, if one is bound.
    ///
    /// The handle stops working once this binding is cleared or replaced.
    #[must_use]
    pub fn graphics(&self) -> Option<GraphicsHandle> {
        self.inner.binding.epoch().map(|epoch| GraphicsHandle {
            binding: Arc::clone(&self.inner.binding),
            epoch,
        })
    }

    pub(crate) fn binding(&self) -> &GraphicsBinding {
        &self.inner.binding
    }

    pub(crate) fn backend(&self) -> &dyn SurfaceBackend {
        &*self.inner.backend
    }

    pub(crate) fn trace(&self) -> &TraceSlot {
        &self.inner.trace
    }

    fn from_weak(weak: &Weak<ContextInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Runs `f` with the listener registered when the task runs.
    fn notify(&self, f: impl FnOnce(&dyn ContextListener, &Self) + Send + 'static) {
        let context = self.clone();
        let posted = self.inner.dispatch.post(move || {
            if let Some(listener) = context.listener() {
                f(&*listener, &context);
            }
        });
        if !posted {
            log::debug!("{:?}: dispatcher closed, notification dropped", self.id());
        }
    }

    fn dropped(&self, request: RequestKind, reason: DropReason) {
        self.inner.trace.dropped(&DroppedEvent {
            surface: self.id(),
            request,
            reason,
            timestamp: time::now(),
        });
    }

    fn lifecycle(&self, kind: LifecycleKind, size: SurfaceSize, epoch: Epoch) {
        self.inner.trace.lifecycle(&LifecycleEvent {
            surface: self.id(),
            kind,
            size,
            epoch,
            timestamp: time::now(),
        });
    }

    fn paint_now(&self) {
        let listener = self.listener();
        let result = self.inner.binding.with_binding(|binding| {
            let frame_index = self.inner.frames.fetch_add(1, Ordering::Relaxed);
            paint::render_frame(self, binding, listener.as_deref(), frame_index)
        });
        match result {
            None => self.dropped(RequestKind::Paint, DropReason::Unbound),
            Some(Ok(report)) => {
                if !report.settled() {
                    log::debug!(
                        "{:?}: frame {} ended {:?} after {} passes and {} presents",
                        self.id(),
                        report.frame_index,
                        report.outcome,
                        report.paint_passes,
                        report.presents,
                    );
                }
            }
            Some(Err(err)) => {
                log::warn!("{:?}: frame abandoned: {err}", self.id());
                self.dropped(RequestKind::Paint, DropReason::Failed);
            }
        }
    }

    fn snapshot_now(&self) {
        let listener = self.listener();
        let result = self.inner.binding.with_binding(|binding| {
            snapshot::render_snapshot(self, binding, listener.as_deref())
        });
        match result {
            None => self.dropped(RequestKind::Snapshot, DropReason::Unbound),
            Some(Ok(bitmap)) => {
                self.notify(move |listener, context| listener.on_snapshot(context, bitmap));
            }
            Some(Err(err)) => {
                log::warn!("{:?}: snapshot abandoned: {err}", self.id());
                self.dropped(RequestKind::Snapshot, DropReason::Failed);
            }
        }
    }

    // The three lifecycle hooks below run under the surface's lifecycle lock.

    fn attached(&self, size: SurfaceSize) {
        let buffers = self.inner.config.effective_buffer_count();
        let chain = match self.inner.backend.create_buffer_chain(size, buffers) {
            Ok(chain) => chain,
            Err(err) => {
                log::error!("{:?}: attach abandoned: {err}", self.id());
                return;
            }
        };
        let epoch = self
            .inner
            .binding
            .set(Binding::new(Graphics::new(size), chain));
        self.lifecycle(LifecycleKind::Attach, size, epoch);
        self.notify(|listener, context| listener.on_create(context));
    }

    fn detached(&self) {
        let Some(epoch) = self.inner.binding.epoch() else {
            log::debug!("{:?}: detached without a binding", self.id());
            return;
        };
        let size = self.inner.surface.state().size;
        self.lifecycle(LifecycleKind::Detach, size, epoch);

        let clear = DeferredClear {
            context: self.clone(),
            epoch,
        };
        let posted = self.inner.dispatch.post(move || {
            if let Some(listener) = clear.context.listener() {
                listener.on_dispose(&clear.context);
            }
            drop(clear);
        });
        if !posted {
            log::debug!("{:?}: dispatcher closed, cleared without dispose", self.id());
        }
    }

    fn resized(&self, size: SurfaceSize) {
        if self.inner.binding.resize(size)
            && let Some(epoch) = self.inner.binding.epoch()
        {
            self.lifecycle(LifecycleKind::Resize, size, epoch);
        }
        self.notify(move |listener, context| {
            listener.on_resize(context, size.width, size.height);
        });
    }

    fn clear_binding(&self, epoch: Epoch) {
        if let Some(binding) = self.inner.binding.clear_epoch(epoch) {
            self.lifecycle(LifecycleKind::Clear, binding.graphics().size(), epoch);
        }
    }
}

/// Clears one epoch's binding when dropped, including during unwinding and
/// when the task owning it is discarded unrun.
struct DeferredClear {
    context: Context,
    epoch: Epoch,
}

impl Drop for DeferredClear {
    fn drop(&mut self) {
        self.context.clear_binding(self.epoch);
    }
}

fn hooks(weak: &Weak<ContextInner>) -> SurfaceHooks {
    fn with(weak: &Weak<ContextInner>, f: impl Fn(&Context)) {
        if let Some(context) = Context::from_weak(weak) {
            f(&context);
        }
    }

    let w = weak.clone();
    let on_attach = Box::new(move |size| with(&w, |c| c.attached(size)));
    let w = weak.clone();
    let on_detach = Box::new(move |()| with(&w, Context::detached));
    let w = weak.clone();
    let on_resize = Box::new(move |size| with(&w, |c| c.resized(size)));
    let w = weak.clone();
    let on_move = Box::new(move |position: SurfacePosition| {
        with(&w, |c| {
            c.notify(move |l, c| l.on_move(c, position.x, position.y));
        });
    });
    let w = weak.clone();
    let on_show = Box::new(move |()| with(&w, |c| c.notify(|l, c| l.on_show(c))));
    let w = weak.clone();
    let on_hide = Box::new(move |()| with(&w, |c| c.notify(|l, c| l.on_hide(c))));
    let w = weak.clone();
    let on_focus_gain = Box::new(move |()| with(&w, |c| c.notify(|l, c| l.on_focus_gain(c))));
    let w = weak.clone();
    let on_focus_lost = Box::new(move |()| with(&w, |c| c.notify(|l, c| l.on_focus_lost(c))));
    let w = weak.clone();
    let on_input = Box::new(move |event: InputEvent| {
        with(&w, |c| {
            let event = event.clone();
            c.notify(move |l, c| {
                if !l.on_input(c, &event) {
                    log::trace!("{:?}: unhandled input {event:?}", c.id());
                }
            });
        });
    });

    SurfaceHooks {
        on_attach,
        on_detach,
        on_resize,
        on_move,
        on_show,
        on_hide,
        on_focus_gain,
        on_focus_lost,
        on_input,
    }
}

/// A handle to the graphics context of one attachment.
///
/// Every call re-checks that the attachment is still bound.
#[derive(Clone)]
pub struct GraphicsHandle {
    binding: Arc<GraphicsBinding>,
    epoch: Epoch,
}

impl fmt::Debug for GraphicsHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsHandle")
            .field("epoch", &self.epoch)
            .field("valid", &self.is_valid())
            .finish_non_exhaustive()
    }
}

impl GraphicsHandle {
    /// The attachment this handle belongs to.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Whether the attachment is still bound.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.binding.epoch() == Some(self.epoch)
    }

    /// Current size of the context, while still bound.
    #[must_use]
    pub fn size(&self) -> Option<SurfaceSize> {
        self.binding.size_for(self.epoch)
    }

    /// Runs `f` with the context under the binding lock, while still bound.
    ///
    /// Must not be called from [`ContextListener::on_paint`]: the lock is
    /// already held there.
    pub fn with<R>(&self, f: impl FnOnce(&mut Graphics) -> R) -> Option<R> {
        self.binding.with_epoch(self.epoch, f)
    }
}
