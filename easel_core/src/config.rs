// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface configuration.

use crate::image::Color;

/// Caps on the paint pipeline's retry loops.
///
/// `None` leaves a loop unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetryLimits {
    /// Paint passes per present attempt. When reached, the last pass is
    /// presented even though the chain reported its contents restored.
    pub max_paint_passes: Option<u32>,
    /// Present attempts per frame. When reached, the frame is abandoned.
    pub max_present_passes: Option<u32>,
}

impl RetryLimits {
    /// Sixteen paint passes and sixteen presents.
    pub const DEFAULT: Self = Self {
        max_paint_passes: Some(16),
        max_present_passes: Some(16),
    };

    /// Retry for as long as the chain asks to.
    pub const UNBOUNDED: Self = Self {
        max_paint_passes: None,
        max_present_passes: None,
    };

    /// Whether `passes` completed paint passes exhaust the inner cap.
    #[inline]
    #[must_use]
    pub const fn paint_exhausted(&self, passes: u32) -> bool {
        match self.max_paint_passes {
            Some(max) => passes >= max,
            None => false,
        }
    }

    /// Whether `presents` completed presents exhaust the outer cap.
    #[inline]
    #[must_use]
    pub const fn present_exhausted(&self, presents: u32) -> bool {
        match self.max_present_passes {
            Some(max) => presents >= max,
            None => false,
        }
    }
}

impl Default for RetryLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Configuration of one [`Context`](crate::context::Context).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Buffers requested for the chain. Values below 2 are promoted to 2.
    pub buffer_count: u32,
    /// Colour a snapshot image is cleared to before painting.
    pub background: Color,
    /// Request focus when an unfocused surface is shown.
    pub focus_on_show: bool,
    /// Paint loop caps.
    pub retry: RetryLimits,
}

impl SurfaceConfig {
    /// Double-buffered, white background, focus on show, default caps.
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            buffer_count: 2,
            background: Color::WHITE,
            focus_on_show: true,
            retry: RetryLimits::DEFAULT,
        }
    }

    /// Like [`desktop`](Self::desktop), with unbounded retry loops.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            retry: RetryLimits::UNBOUNDED,
            ..Self::desktop()
        }
    }

    /// Sets the requested buffer count.
    #[must_use]
    pub const fn with_buffer_count(mut self, buffer_count: u32) -> Self {
        self.buffer_count = buffer_count;
        self
    }

    /// Sets the snapshot background.
    #[must_use]
    pub const fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Enables or disables focus on show.
    #[must_use]
    pub const fn with_focus_on_show(mut self, focus_on_show: bool) -> Self {
        self.focus_on_show = focus_on_show;
        self
    }

    /// Sets the retry caps.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryLimits) -> Self {
        self.retry = retry;
        self
    }

    /// Buffers actually allocated: [`buffer_count`](Self::buffer_count), at
    /// least 2.
    #[inline]
    #[must_use]
    pub const fn effective_buffer_count(&self) -> u32 {
        if self.buffer_count < 2 {
            2
        } else {
            self.buffer_count
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self::desktop()
    }
}
