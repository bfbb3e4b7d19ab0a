// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The simulated display shared by a backend and its chains.

use std::collections::VecDeque;
use std::sync::Arc;

use easel_core::backend::{BufferChain, SurfaceBackend};
use easel_core::error::SurfaceError;
use easel_core::geometry::SurfaceSize;
use easel_core::image::{Bitmap, PixelBuffer, PixelFormat};
use easel_core::time::{self, HostTime};
use parking_lot::Mutex;

use crate::chain::SoftwareBufferChain;
use crate::queue::BoundedQueue;

/// Default number of [`PresentRecord`]s kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Scripted buffer invalidations.
///
/// Each chain query consumes the next answer; once a queue is empty the
/// answer is `false`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidationScript {
    restored: VecDeque<bool>,
    lost: VecDeque<bool>,
}

impl InvalidationScript {
    /// An empty script: buffers never restore, presents never get lost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends answers for upcoming `contents_restored` queries.
    #[must_use]
    pub fn restored(mut self, answers: &[bool]) -> Self {
        self.restored.extend(answers);
        self
    }

    /// Appends answers for upcoming `contents_lost` queries.
    #[must_use]
    pub fn lost(mut self, answers: &[bool]) -> Self {
        self.lost.extend(answers);
        self
    }

    /// Whether no answers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restored.is_empty() && self.lost.is_empty()
    }

    fn append(&mut self, other: Self) {
        self.restored.extend(other.restored);
        self.lost.extend(other.lost);
    }
}

/// One call to `present`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresentRecord {
    /// 1-based present counter of the display.
    pub sequence: u64,
    /// Chain that presented.
    pub chain: u32,
    /// Buffer index within that chain.
    pub buffer: usize,
    /// Size of the presented buffer.
    pub size: SurfaceSize,
    /// Whether the present was reported lost and reverted.
    pub discarded: bool,
    /// Host time of the present.
    pub timestamp: HostTime,
}

/// A copy of the bounded present history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentHistory {
    /// Records, oldest first.
    pub records: Vec<PresentRecord>,
    /// Records evicted to stay within capacity.
    pub dropped: u64,
}

impl PresentHistory {
    /// Presents that were not reverted.
    pub fn kept(&self) -> impl Iterator<Item = &PresentRecord> {
        self.records.iter().filter(|r| !r.discarded)
    }
}

#[derive(Debug)]
pub(crate) struct Display {
    pub(crate) front: Option<PixelBuffer>,
    pub(crate) history: BoundedQueue<PresentRecord>,
    pub(crate) script: InvalidationScript,
    pub(crate) acquires: u64,
    pub(crate) presents: u64,
    fail_chain: bool,
    fail_image: bool,
    next_chain: u32,
}

impl Display {
    pub(crate) fn next_restored(&mut self) -> bool {
        self.script.restored.pop_front().unwrap_or(false)
    }

    pub(crate) fn next_lost(&mut self) -> bool {
        self.script.lost.pop_front().unwrap_or(false)
    }

    /// Makes `buffer` the front buffer, returning the previous one.
    pub(crate) fn show(
        &mut self,
        chain: u32,
        index: usize,
        buffer: &PixelBuffer,
    ) -> Option<PixelBuffer> {
        self.presents += 1;
        self.history.push(PresentRecord {
            sequence: self.presents,
            chain,
            buffer: index,
            size: buffer.size(),
            discarded: false,
            timestamp: time::now(),
        });
        self.front.replace(buffer.clone())
    }

    /// Reverts the newest present.
    pub(crate) fn revert(&mut self, previous: Option<PixelBuffer>) {
        self.front = previous;
        if let Some(record) = self.history.newest_mut() {
            record.discarded = true;
        }
    }
}

/// A CPU [`SurfaceBackend`] presenting into one simulated display.
///
/// Cloning yields another handle to the same display.
#[derive(Clone, Debug)]
pub struct SoftwareBackend {
    display: Arc<Mutex<Display>>,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBackend {
    /// Creates a backend with an empty display.
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Creates a backend keeping at most `capacity` present records.
    #[must_use]
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            display: Arc::new(Mutex::new(Display {
                front: None,
                history: BoundedQueue::with_capacity(capacity),
                script: InvalidationScript::new(),
                acquires: 0,
                presents: 0,
                fail_chain: false,
                fail_image: false,
                next_chain: 1,
            })),
        }
    }

    /// Queues invalidations behind any still pending.
    pub fn script(&self, script: InvalidationScript) {
        self.display.lock().script.append(script);
    }

    /// Makes later chain allocations fail.
    pub fn fail_chain_allocation(&self, fail: bool) {
        self.display.lock().fail_chain = fail;
    }

    /// Makes later image allocations fail.
    pub fn fail_image_allocation(&self, fail: bool) {
        self.display.lock().fail_image = fail;
    }

    /// What the display currently shows.
    #[must_use]
    pub fn front_buffer(&self) -> Option<Bitmap> {
        self.display.lock().front.as_ref().map(PixelBuffer::to_bitmap)
    }

    /// Recent presents.
    #[must_use]
    pub fn history(&self) -> PresentHistory {
        let display = self.display.lock();
        PresentHistory {
            records: display.history.iter().copied().collect(),
            dropped: display.history.dropped_count(),
        }
    }

    /// Back buffers handed out so far.
    #[must_use]
    pub fn acquire_count(&self) -> u64 {
        self.display.lock().acquires
    }

    /// Presents performed so far, including reverted ones.
    #[must_use]
    pub fn present_count(&self) -> u64 {
        self.display.lock().presents
    }

    /// Creates a chain of `buffers` (at least two) buffers on this display.
    pub fn buffer_chain(
        &self,
        size: SurfaceSize,
        buffers: u32,
    ) -> Result<SoftwareBufferChain, SurfaceError> {
        let id = {
            let mut display = self.display.lock();
            if display.fail_chain {
                return Err(SurfaceError::ChainAllocation { size, buffers });
            }
            let id = display.next_chain;
            display.next_chain += 1;
            id
        };
        log::debug!(
            "chain {id}: {buffers} buffers of {}x{}",
            size.width,
            size.height
        );
        Ok(SoftwareBufferChain::new(
            Arc::clone(&self.display),
            id,
            size,
            buffers,
        ))
    }
}

impl SurfaceBackend for SoftwareBackend {
    fn create_buffer_chain(
        &self,
        size: SurfaceSize,
        buffers: u32,
    ) -> Result<Box<dyn BufferChain>, SurfaceError> {
        Ok(Box::new(self.buffer_chain(size, buffers)?))
    }

    fn create_image(
        &self,
        size: SurfaceSize,
        format: PixelFormat,
    ) -> Result<PixelBuffer, SurfaceError> {
        if self.display.lock().fail_image {
            return Err(SurfaceError::ImageAllocation(size));
        }
        match format {
            PixelFormat::Rgba8888 => PixelBuffer::try_new(size),
        }
    }
}
