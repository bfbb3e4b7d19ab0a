// Copyright 2026 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The single event-dispatch thread.
//!
//! Every listener callback and every paint or snapshot render runs on one
//! dedicated thread owned by an [`EventDispatcher`]. Other threads hand work
//! to it through cloneable [`DispatchHandle`]s; tasks run in the order they
//! were posted.
//!
//! ```text
//!  surface signal ─┐
//!  request_paint ──┼─ DispatchHandle::post ──► [ FIFO ] ──► easel-dispatch
//!  request_snapshot┘                                         (one task at a time)
//! ```
//!
//! A task that panics is reported with [`log::error!`] and counted; the
//! thread moves on to the next task.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, mpsc};
use std::thread::{self, JoinHandle, ThreadId};

use parking_lot::Mutex;

/// Name of the dispatch thread.
pub const THREAD_NAME: &str = "easel-dispatch";

type Task = Box<dyn FnOnce() + Send + 'static>;

struct Shared {
    sender: Mutex<Option<mpsc::Sender<Task>>>,
    thread: OnceLock<ThreadId>,
    panics: AtomicU64,
}

/// Owns the dispatch thread.
///
/// Dropping the dispatcher stops accepting tasks, runs everything already
/// queued, and joins the thread.
pub struct EventDispatcher {
    handle: DispatchHandle,
    thread: Option<JoinHandle<()>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("running", &self.thread.is_some())
            .field("panics", &self.handle.panic_count())
            .finish_non_exhaustive()
    }
}

impl EventDispatcher {
    /// Starts the dispatch thread.
    pub fn spawn() -> io::Result<Self> {
        let (sender, receiver) = mpsc::channel::<Task>();
        let shared = Arc::new(Shared {
            sender: Mutex::new(Some(sender)),
            thread: OnceLock::new(),
            panics: AtomicU64::new(0),
        });
        let worker = Arc::clone(&shared);
        let thread = thread::Builder::new()
            .name(THREAD_NAME.into())
            .spawn(move || run(&worker, &receiver))?;
        Ok(Self {
            handle: DispatchHandle { shared },
            thread: Some(thread),
        })
    }

    /// Returns a handle for posting tasks.
    #[must_use]
    pub fn handle(&self) -> DispatchHandle {
        self.handle.clone()
    }

    /// See [`DispatchHandle::flush`].
    pub fn flush(&self) -> bool {
        self.handle.flush()
    }

    /// Stops accepting tasks, drains the queue, and joins the thread.
    ///
    /// Called on the dispatch thread itself, this only stops accepting tasks.
    pub fn shutdown(&mut self) {
        self.handle.shared.sender.lock().take();
        let Some(thread) = self.thread.take() else {
            return;
        };
        if self.handle.is_dispatch_thread() {
            return;
        }
        if thread.join().is_err() {
            log::error!("{THREAD_NAME} thread terminated abnormally");
        }
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(shared: &Shared, receiver: &mpsc::Receiver<Task>) {
    _ = shared.thread.set(thread::current().id());
    for task in receiver {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(task)) {
            let count = shared.panics.fetch_add(1, Ordering::Relaxed) + 1;
            let message = payload
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                .unwrap_or("<non-string payload>");
            log::error!("dispatch task panicked ({count} so far): {message}");
        }
    }
    log::debug!("{THREAD_NAME} drained, exiting");
}

/// Posts tasks to an [`EventDispatcher`]. Cloning is cheap (Arc bump).
#[derive(Clone)]
pub struct DispatchHandle {
    shared: Arc<Shared>,
}

impl fmt::Debug for DispatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchHandle")
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl DispatchHandle {
    /// Queues `task` behind everything posted before it.
    ///
    /// Returns `false`, dropping the task, once the dispatcher shut down.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> bool {
        let sender = self.shared.sender.lock();
        match sender.as_ref() {
            Some(sender) => sender.send(Box::new(task)).is_ok(),
            None => false,
        }
    }

    /// Whether tasks are still accepted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.sender.lock().is_some()
    }

    /// Whether the calling thread is the dispatch thread.
    #[must_use]
    pub fn is_dispatch_thread(&self) -> bool {
        self.shared.thread.get() == Some(&thread::current().id())
    }

    /// Blocks until every task posted before this call has run.
    ///
    /// Returns `false` without waiting when called on the dispatch thread or
    /// after shutdown.
    pub fn flush(&self) -> bool {
        if self.is_dispatch_thread() {
            return false;
        }
        let (done, wait) = mpsc::sync_channel::<()>(1);
        if !self.post(move || {
            _ = done.send(());
        }) {
            return false;
        }
        wait.recv().is_ok()
    }

    /// Number of tasks that panicked so far.
    #[must_use]
    pub fn panic_count(&self) -> u64 {
        self.shared.panics.load(Ordering::Relaxed)
    }
}
