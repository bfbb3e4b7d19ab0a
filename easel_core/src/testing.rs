// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::{Arc, mpsc};

use parking_lot::Mutex;

use crate::backend::{BufferChain, SurfaceBackend};
use crate::context::Context;
use crate::error::SurfaceError;
use crate::geometry::SurfaceSize;
use crate::graphics::{DrawTarget, Graphics};
use crate::image::{Bitmap, PixelBuffer, PixelFormat, SharedPixelBuffer};
use crate::input::InputEvent;
use crate::listener::ContextListener;

/// One call observed by a [`ScriptedChain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChainCall {
    Acquire,
    Restored(bool),
    Present,
    Lost(bool),
    Resize(SurfaceSize),
}

#[derive(Debug, Default)]
pub(crate) struct ChainState {
    pub(crate) calls: Vec<ChainCall>,
    pub(crate) restored: VecDeque<bool>,
    pub(crate) lost: VecDeque<bool>,
    pub(crate) fail_acquire: bool,
}

/// Shared view into a [`ScriptedChain`] after it was boxed.
#[derive(Clone, Debug, Default)]
pub(crate) struct ChainProbe(pub(crate) Arc<Mutex<ChainState>>);

impl ChainProbe {
    pub(crate) fn script(&self, restored: &[bool], lost: &[bool]) {
        let mut state = self.0.lock();
        state.restored.extend(restored);
        state.lost.extend(lost);
    }

    pub(crate) fn calls(&self) -> Vec<ChainCall> {
        self.0.lock().calls.clone()
    }

    pub(crate) fn count(&self, call: ChainCall) -> usize {
        self.0.lock().calls.iter().filter(|c| **c == call).count()
    }
}

/// A buffer chain whose restored/lost answers come from a script.
#[derive(Debug)]
pub(crate) struct ScriptedChain {
    back: SharedPixelBuffer,
    probe: ChainProbe,
}

impl ScriptedChain {
    pub(crate) fn new(size: SurfaceSize) -> Self {
        Self::with_probe(size, ChainProbe::default())
    }

    pub(crate) fn with_probe(size: SurfaceSize, probe: ChainProbe) -> Self {
        Self {
            back: SharedPixelBuffer::new(PixelBuffer::new(size)),
            probe,
        }
    }
}

impl BufferChain for ScriptedChain {
    fn draw_target(&mut self) -> Result<Box<dyn DrawTarget>, SurfaceError> {
        let mut state = self.probe.0.lock();
        if state.fail_acquire {
            return Err(SurfaceError::Acquire("scripted failure".into()));
        }
        state.calls.push(ChainCall::Acquire);
        Ok(Box::new(self.back.clone()))
    }

    fn contents_restored(&mut self) -> bool {
        let mut state = self.probe.0.lock();
        let restored = state.restored.pop_front().unwrap_or(false);
        state.calls.push(ChainCall::Restored(restored));
        restored
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.probe.0.lock().calls.push(ChainCall::Present);
        Ok(())
    }

    fn contents_lost(&mut self) -> bool {
        let mut state = self.probe.0.lock();
        let lost = state.lost.pop_front().unwrap_or(false);
        state.calls.push(ChainCall::Lost(lost));
        lost
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.probe.0.lock().calls.push(ChainCall::Resize(size));
        self.back = SharedPixelBuffer::new(PixelBuffer::new(size));
    }
}

/// Backend handing out [`ScriptedChain`]s that share one probe.
#[derive(Debug, Default)]
pub(crate) struct ScriptedBackend {
    pub(crate) probe: ChainProbe,
    pub(crate) fail_chain: Mutex<bool>,
    pub(crate) fail_image: Mutex<bool>,
    pub(crate) requested_buffers: Mutex<Vec<u32>>,
    pub(crate) chain_gate: Mutex<Option<ChainGate>>,
}

/// Holds one chain allocation until released.
#[derive(Debug)]
pub(crate) struct ChainGate {
    entered: mpsc::Sender<()>,
    release: mpsc::Receiver<()>,
}

impl ScriptedBackend {
    /// Makes the next chain allocation block.
    ///
    /// The first channel fires once the allocation has started; sending on
    /// the second lets it finish.
    pub(crate) fn gate_next_chain(&self) -> (mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered, entered_rx) = mpsc::channel();
        let (release_tx, release) = mpsc::channel();
        *self.chain_gate.lock() = Some(ChainGate { entered, release });
        (entered_rx, release_tx)
    }
}

impl SurfaceBackend for ScriptedBackend {
    fn create_buffer_chain(
        &self,
        size: SurfaceSize,
        buffers: u32,
    ) -> Result<Box<dyn BufferChain>, SurfaceError> {
        self.requested_buffers.lock().push(buffers);
        let gate = self.chain_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.recv();
        }
        if *self.fail_chain.lock() {
            return Err(SurfaceError::ChainAllocation { size, buffers });
        }
        Ok(Box::new(ScriptedChain::with_probe(size, self.probe.clone())))
    }

    fn create_image(
        &self,
        size: SurfaceSize,
        _format: PixelFormat,
    ) -> Result<PixelBuffer, SurfaceError> {
        if *self.fail_image.lock() {
            return Err(SurfaceError::ImageAllocation(size));
        }
        PixelBuffer::try_new(size)
    }
}

/// A listener notification, as recorded by [`RecordingListener`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Seen {
    Create,
    Dispose { bound: bool },
    Show,
    Hide,
    FocusGain,
    FocusLost,
    Resize(u32, u32),
    Move(i32, i32),
    Paint { size: SurfaceSize, snapshot: bool },
    Snapshot(SurfaceSize),
    Input,
}

/// Records every notification in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingListener {
    pub(crate) seen: Mutex<Vec<Seen>>,
    pub(crate) snapshots: Mutex<Vec<Bitmap>>,
    pub(crate) paint_fill: Mutex<Option<crate::image::Color>>,
}

impl RecordingListener {
    pub(crate) fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }

    pub(crate) fn paints(&self) -> usize {
        self.seen
            .lock()
            .iter()
            .filter(|s| matches!(s, Seen::Paint { snapshot: false, .. }))
            .count()
    }
}

impl ContextListener for RecordingListener {
    fn on_create(&self, _context: &Context) {
        self.seen.lock().push(Seen::Create);
    }

    fn on_dispose(&self, context: &Context) {
        let bound = context.graphics().is_some();
        self.seen.lock().push(Seen::Dispose { bound });
    }

    fn on_show(&self, _context: &Context) {
        self.seen.lock().push(Seen::Show);
    }

    fn on_hide(&self, _context: &Context) {
        self.seen.lock().push(Seen::Hide);
    }

    fn on_focus_gain(&self, _context: &Context) {
        self.seen.lock().push(Seen::FocusGain);
    }

    fn on_focus_lost(&self, _context: &Context) {
        self.seen.lock().push(Seen::FocusLost);
    }

    fn on_resize(&self, _context: &Context, width: u32, height: u32) {
        self.seen.lock().push(Seen::Resize(width, height));
    }

    fn on_move(&self, _context: &Context, x: i32, y: i32) {
        self.seen.lock().push(Seen::Move(x, y));
    }

    fn on_paint(&self, _context: &Context, graphics: &mut Graphics, snapshot: bool) {
        if let Some(color) = *self.paint_fill.lock() {
            graphics.set_color(color);
            graphics.fill_rect(graphics.size().to_rect());
        }
        self.seen.lock().push(Seen::Paint {
            size: graphics.size(),
            snapshot,
        });
    }

    fn on_snapshot(&self, _context: &Context, snapshot: Bitmap) {
        self.seen.lock().push(Seen::Snapshot(snapshot.size()));
        self.snapshots.lock().push(snapshot);
    }

    fn on_input(&self, _context: &Context, _event: &InputEvent) -> bool {
        self.seen.lock().push(Seen::Input);
        true
    }
}
