// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live paint pipeline.
//!
//! One paint request renders one frame into the surface's buffer chain:
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │ ┌──────────────────────────────────────────┐ │
//!   │ │ acquire back buffer → bind → reset       │ │
//!   │ │ → on_paint(.., false) → release          │ │
//!   │ └──── repeat while contents restored ──────┘ │
//!   │ present                                      │
//!   └──────── repeat while contents lost ──────────┘
//! ```
//!
//! The whole frame runs with the graphics binding locked. [`RetryLimits`]
//! optionally caps both loops.
//!
//! [`RetryLimits`]: crate::config::RetryLimits

use crate::binding::Binding;
use crate::context::Context;
use crate::error::SurfaceError;
use crate::listener::ContextListener;
use crate::time;
use crate::trace::{FrameEvent, FrameOutcome, PaintPassEvent, PresentEvent};

/// Summary of one rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FrameReport {
    pub(crate) frame_index: u64,
    pub(crate) paint_passes: u32,
    pub(crate) presents: u32,
    pub(crate) outcome: FrameOutcome,
}

impl FrameReport {
    /// Whether the chain accepted the frame without hitting a cap.
    pub(crate) fn settled(&self) -> bool {
        self.outcome == FrameOutcome::Presented
    }
}

/// Renders and presents one frame. Must be called with the binding locked.
///
/// Acquisition and presentation errors end the frame early.
pub(crate) fn render_frame(
    context: &Context,
    binding: &mut Binding,
    listener: Option<&dyn ContextListener>,
    frame_index: u64,
) -> Result<FrameReport, SurfaceError> {
    let surface = context.id();
    let limits = context.config().retry;
    let trace = context.trace();
    let started = time::now();

    let (graphics, chain) = binding.parts_mut();
    let mut paint_passes = 0_u32;
    let mut presents = 0_u32;
    let mut capped = false;

    let outcome = loop {
        let mut attempt_passes = 0_u32;
        loop {
            let target = chain.draw_target()?;
            {
                let mut bound = graphics.bind(target);
                bound.reset();
                if let Some(listener) = listener {
                    listener.on_paint(context, &mut bound, false);
                }
            }
            attempt_passes += 1;
            paint_passes += 1;

            let restored = chain.contents_restored();
            trace.paint_pass(&PaintPassEvent {
                surface,
                frame_index,
                pass: paint_passes,
                restored,
                timestamp: time::now(),
            });
            if !restored {
                break;
            }
            if limits.paint_exhausted(attempt_passes) {
                log::warn!(
                    "{surface:?} frame {frame_index}: contents still restored after \
                     {attempt_passes} passes, presenting anyway"
                );
                capped = true;
                break;
            }
        }

        chain.present()?;
        presents += 1;

        let lost = chain.contents_lost();
        trace.present(&PresentEvent {
            surface,
            frame_index,
            attempt: presents,
            lost,
            timestamp: time::now(),
        });
        if !lost {
            break if capped {
                FrameOutcome::PaintCapped
            } else {
                FrameOutcome::Presented
            };
        }
        if limits.present_exhausted(presents) {
            log::warn!(
                "{surface:?} frame {frame_index}: contents still lost after \
                 {presents} presents, abandoning frame"
            );
            break FrameOutcome::Abandoned;
        }
    };

    trace.frame(&FrameEvent {
        surface,
        frame_index,
        paint_passes,
        presents,
        outcome,
        started,
        finished: time::now(),
    });

    Ok(FrameReport {
        frame_index,
        paint_passes,
        presents,
        outcome,
    })
}
