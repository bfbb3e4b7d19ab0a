// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lock-guarded association between a surface and its graphics context.
//!
//! [`GraphicsBinding`] holds at most one [`Binding`]: the [`Graphics`]
//! context and the [`BufferChain`] of the current attachment. Installing,
//! resizing, clearing, and every paint or snapshot render happen under the
//! same [`parking_lot::Mutex`], so a render never observes a context halfway
//! through a resize or a dispose.
//!
//! A lock-free mirror of the current [`Epoch`] answers "is anything bound?"
//! for callers that only need to decide whether scheduling work is worth it.
//! The answer can be stale by the time the caller acts on it; the work itself
//! re-checks under the lock.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::backend::BufferChain;
use crate::geometry::SurfaceSize;
use crate::graphics::Graphics;

/// Identifies one installed binding.
///
/// Epochs increase monotonically per [`GraphicsBinding`]; `0` is never used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(pub u64);

/// The graphics context and buffer chain of one attachment.
pub struct Binding {
    epoch: Epoch,
    graphics: Graphics,
    chain: Box<dyn BufferChain>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("epoch", &self.epoch)
            .field("graphics", &self.graphics)
            .finish_non_exhaustive()
    }
}

impl Binding {
    /// Pairs a context with the chain it renders into.
    ///
    /// The epoch is assigned by [`GraphicsBinding::set`].
    #[must_use]
    pub fn new(graphics: Graphics, chain: Box<dyn BufferChain>) -> Self {
        Self {
            epoch: Epoch(0),
            graphics,
            chain,
        }
    }

    /// The epoch assigned when this binding was installed.
    #[inline]
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// The bound graphics context.
    #[inline]
    #[must_use]
    pub fn graphics(&self) -> &Graphics {
        &self.graphics
    }

    /// The bound graphics context, mutably.
    #[inline]
    pub fn graphics_mut(&mut self) -> &mut Graphics {
        &mut self.graphics
    }

    /// Splits the binding into its context and chain.
    pub fn parts_mut(&mut self) -> (&mut Graphics, &mut dyn BufferChain) {
        (&mut self.graphics, &mut *self.chain)
    }
}

/// Zero-or-one [`Binding`] behind a single lock.
pub struct GraphicsBinding {
    slot: Mutex<Option<Binding>>,
    next_epoch: AtomicU64,
    live_epoch: AtomicU64,
}

impl fmt::Debug for GraphicsBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphicsBinding")
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}

impl Default for GraphicsBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBinding {
    /// Creates an empty binding slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            next_epoch: AtomicU64::new(1),
            live_epoch: AtomicU64::new(0),
        }
    }

    /// Installs `binding`, replacing (and dropping) any previous one.
    pub fn set(&self, mut binding: Binding) -> Epoch {
        let epoch = Epoch(self.next_epoch.fetch_add(1, Ordering::Relaxed));
        binding.epoch = epoch;
        let previous = {
            let mut slot = self.slot.lock();
            self.live_epoch.store(epoch.0, Ordering::Release);
            slot.replace(binding)
        };
        drop(previous);
        epoch
    }

    /// Removes the current binding.
    pub fn clear(&self) -> Option<Binding> {
        let mut slot = self.slot.lock();
        self.live_epoch.store(0, Ordering::Release);
        slot.take()
    }

    /// Removes the current binding only if it was installed as `epoch`.
    pub fn clear_epoch(&self, epoch: Epoch) -> Option<Binding> {
        let mut slot = self.slot.lock();
        if slot.as_ref().is_some_and(|b| b.epoch == epoch) {
            self.live_epoch.store(0, Ordering::Release);
            slot.take()
        } else {
            None
        }
    }

    /// Runs `f` with the current binding under the lock.
    ///
    /// Returns `None` without calling `f` when nothing is bound.
    pub fn with_binding<R>(&self, f: impl FnOnce(&mut Binding) -> R) -> Option<R> {
        let mut slot = self.slot.lock();
        slot.as_mut().map(f)
    }

    /// Resizes the bound context and chain in place.
    ///
    /// Returns `false` when nothing is bound.
    pub fn resize(&self, size: SurfaceSize) -> bool {
        self.with_binding(|binding| {
            binding.graphics.set_size(size);
            binding.chain.resize(size);
        })
        .is_some()
    }

    /// Whether a binding is installed. Lock-free; may be stale.
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.live_epoch.load(Ordering::Acquire) != 0
    }

    /// Epoch of the installed binding. Lock-free; may be stale.
    #[must_use]
    pub fn epoch(&self) -> Option<Epoch> {
        match self.live_epoch.load(Ordering::Acquire) {
            0 => None,
            e => Some(Epoch(e)),
        }
    }

    /// Size of the bound context.
    #[must_use]
    pub fn size(&self) -> Option<SurfaceSize> {
        self.with_binding(|binding| binding.graphics.size())
    }

    /// Size of the bound context, only if it still belongs to `epoch`.
    #[must_use]
    pub fn size_for(&self, epoch: Epoch) -> Option<SurfaceSize> {
        self.with_epoch(epoch, |graphics| graphics.size())
    }

    /// Runs `f` with the context of `epoch` under the lock.
    pub fn with_epoch<R>(&self, epoch: Epoch, f: impl FnOnce(&mut Graphics) -> R) -> Option<R> {
        let mut slot = self.slot.lock();
        match slot.as_mut() {
            Some(binding) if binding.epoch == epoch => Some(f(&mut binding.graphics)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedChain;

    fn binding(size: SurfaceSize) -> Binding {
        Binding::new(Graphics::new(size), Box::new(ScriptedChain::new(size)))
    }

    #[test]
    fn empty_binding_skips_closure() {
        let slot = GraphicsBinding::new();
        let mut called = false;
        assert!(slot.with_binding(|_| called = true).is_none());
        assert!(!called);
        assert!(!slot.is_bound());
        assert_eq!(slot.size(), None);
    }

    #[test]
    fn set_assigns_increasing_epochs() {
        let slot = GraphicsBinding::new();
        let first = slot.set(binding(SurfaceSize::new(1, 1)));
        let second = slot.set(binding(SurfaceSize::new(2, 2)));
        assert!(second > first);
        assert_eq!(slot.epoch(), Some(second));
        assert_eq!(slot.size(), Some(SurfaceSize::new(2, 2)));
    }

    #[test]
    fn resize_keeps_identity() {
        let slot = GraphicsBinding::new();
        let epoch = slot.set(binding(SurfaceSize::new(800, 600)));
        assert!(slot.resize(SurfaceSize::new(400, 300)));
        assert_eq!(slot.epoch(), Some(epoch));
        assert_eq!(slot.size_for(epoch), Some(SurfaceSize::new(400, 300)));
    }

    #[test]
    fn resize_without_binding_reports_false() {
        let slot = GraphicsBinding::new();
        assert!(!slot.resize(SurfaceSize::new(5, 5)));
    }

    #[test]
    fn clear_epoch_ignores_newer_binding() {
        let slot = GraphicsBinding::new();
        let old = slot.set(binding(SurfaceSize::new(1, 1)));
        let new = slot.set(binding(SurfaceSize::new(2, 2)));

        assert!(slot.clear_epoch(old).is_none());
        assert_eq!(slot.epoch(), Some(new));

        assert!(slot.clear_epoch(new).is_some());
        assert!(!slot.is_bound());
        assert_eq!(slot.size_for(new), None);
    }

    #[test]
    fn concurrent_resizes_are_never_torn() {
        use std::sync::Arc;
        use std::thread;

        let slot = Arc::new(GraphicsBinding::new());
        slot.set(binding(SurfaceSize::new(10, 100)));

        let writers: Vec<_> = (1..=4_u32)
            .map(|n| {
                let slot = Arc::clone(&slot);
                thread::spawn(move || {
                    for _ in 0..500 {
                        slot.resize(SurfaceSize::new(n * 10, n * 100));
                    }
                })
            })
            .collect();

        for _ in 0..2_000 {
            let size = slot.size().unwrap();
            assert_eq!(size.height, size.width * 10, "observed torn size {size:?}");
        }
        for w in writers {
            w.join().unwrap();
        }
    }
}
