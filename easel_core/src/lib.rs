// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Surface lifecycle and paint pipeline.
//!
//! `easel_core` lets an application register a single
//! [`ContextListener`](listener::ContextListener) that receives lifecycle,
//! input, and paint events for one drawable surface. The surface manages
//! double-buffered presentation and on-demand snapshots itself.
//!
//! # Architecture
//!
//! ```text
//!   platform glue
//!       │  attach / detach / resize / move / show / hide / focus / input
//!       ▼
//!   SurfaceComponent ──hooks──► Context ──post──► EventDispatcher thread
//!                                  │                     │
//!                                  │ set / resize / clear│ listener callbacks
//!                                  ▼                     ▼
//!                            GraphicsBinding ◄──lock── paint / snapshot
//!                          (Graphics + BufferChain)      │
//!                                                        ▼
//!                                             present / on_snapshot(Bitmap)
//! ```
//!
//! **[`binding`]**: The lock-guarded slot holding the graphics context and
//! buffer chain of the current attachment.
//!
//! **[`surface`]**: Observed native surface state and the closure hooks that
//! turn native signals into context work.
//!
//! **paint** (internal): The two-level contents-restored / contents-lost
//! retry loop behind [`Context::request_paint`](context::Context::request_paint).
//!
//! **snapshot** (internal): Off-path rendering into an offscreen
//! [`Bitmap`](image::Bitmap) behind
//! [`Context::request_snapshot`](context::Context::request_snapshot).
//!
//! **[`context`]**: The facade the application holds.
//!
//! **[`dispatch`]**: The single event-dispatch thread.
//!
//! **[`backend`]**: [`BufferChain`](backend::BufferChain) and
//! [`SurfaceBackend`](backend::SurfaceBackend), the contracts platform
//! backends implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pipeline instrumentation.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `TraceSlot` emission (one lock
//!   per event while a sink is installed).

pub mod backend;
pub mod binding;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod graphics;
pub mod image;
pub mod input;
pub mod listener;
mod paint;
mod snapshot;
pub mod surface;
pub mod time;
pub mod trace;

#[cfg(test)]
mod testing;
