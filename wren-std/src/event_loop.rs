//! Tokio-backed event loops.
//!
//! [`TokioEventLoop`] adapts a tokio runtime handle to the [`EventLoop`]
//! contract. [`EventLoopGroup`] owns a pool of single-threaded runtimes, one
//! per OS thread, so that work submitted to a loop always runs on that loop's
//! thread.

use crate::config::Configuration;
use std::{
    io,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};
use tokio::{runtime, sync::oneshot};
use wren_core::{BoxTask, EventLoop, EventLoopHandle};

/// An [`EventLoop`] backed by a tokio runtime handle.
#[derive(Debug, Clone)]
pub struct TokioEventLoop {
    id: usize,
    handle: runtime::Handle,
}

impl TokioEventLoop {
    /// Wrap a runtime handle under the given loop id.
    pub fn new(id: usize, handle: runtime::Handle) -> Self {
        Self { id, handle }
    }

    /// A handle to the runtime the caller is running on, as loop `0`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, like
    /// [`tokio::runtime::Handle::current`].
    pub fn current() -> EventLoopHandle {
        EventLoopHandle::new(Self::new(0, runtime::Handle::current()))
    }

    /// The underlying runtime handle.
    pub fn handle(&self) -> &runtime::Handle {
        &self.handle
    }
}

impl EventLoop for TokioEventLoop {
    fn id(&self) -> usize {
        self.id
    }

    fn execute(&self, task: BoxTask) {
        self.handle.spawn(task);
    }
}

struct Worker {
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<thread::JoinHandle<()>>,
}

/// A fixed pool of single-threaded event loops.
///
/// Each loop runs a current-thread tokio runtime on a dedicated thread named
/// `wren-event-loop-{id}`. Loops are handed out round-robin by
/// [`EventLoopGroup::next`]. Dropping the group stops every loop; tasks still
/// pending on a stopped loop are dropped.
pub struct EventLoopGroup {
    loops: Vec<EventLoopHandle>,
    workers: Vec<Worker>,
    cursor: AtomicUsize,
}

impl EventLoopGroup {
    /// Start `count` event loops (at least one).
    pub fn new(count: usize) -> io::Result<Self> {
        let count = count.max(1);
        let mut loops = Vec::with_capacity(count);
        let mut workers = Vec::with_capacity(count);

        for id in 0..count {
            let runtime = runtime::Builder::new_current_thread().enable_all().build()?;
            let handle = runtime.handle().clone();
            let (shutdown, stopped) = oneshot::channel::<()>();

            let thread = thread::Builder::new()
                .name(format!("wren-event-loop-{id}"))
                .spawn(move || {
                    runtime.block_on(async {
                        let _ = stopped.await;
                    });
                })?;

            loops.push(EventLoopHandle::new(TokioEventLoop::new(id, handle)));
            workers.push(Worker {
                shutdown: Some(shutdown),
                thread: Some(thread),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(count, "event loop group started");

        Ok(Self {
            loops,
            workers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Start as many loops as the configuration asks for.
    pub fn from_configuration(configuration: &Configuration) -> io::Result<Self> {
        Self::new(configuration.event_loops())
    }

    /// The next loop, round-robin.
    pub fn next(&self) -> EventLoopHandle {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.loops.len();
        self.loops[index].clone()
    }

    /// The loop with the given id.
    pub fn get(&self, id: usize) -> Option<&EventLoopHandle> {
        self.loops.get(id)
    }

    /// Number of loops in the group.
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Always `false`; a group holds at least one loop.
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

impl Drop for EventLoopGroup {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            if let Some(shutdown) = worker.shutdown.take() {
                let _ = shutdown.send(());
            }
        }
        let current = thread::current().id();
        for worker in &mut self.workers {
            if let Some(thread) = worker.thread.take() {
                // A loop cannot join itself.
                if thread.thread().id() != current {
                    let _ = thread.join();
                }
            }
        }
    }
}
