//! # Execution Context
//!
//! Every request is pinned to the worker that accepted its connection. That
//! worker is represented by an [`EventLoop`], and every [`Request`] carries an
//! [`EventLoopHandle`] to it. Work that completes a request's response is
//! either run inline on the task already driving that request, or submitted
//! to the request's loop through [`EventLoopHandle::execute`].
//!
//! # Completion Slots
//!
//! [`Promise`] is a single-use completion slot. Resolving it consumes it, so a
//! promise can be resolved at most once. A promise that is dropped without
//! being resolved completes its [`PromiseFuture`] with
//! [`ResponderError::PromiseDropped`] instead of leaving the waiter stuck.
//!
//! [`Request`]: crate::Request

use crate::error::{BoxError, ResponderError};
use futures::channel::oneshot;
use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

/// A boxed, `'static` unit of work submitted to an event loop.
pub type BoxTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// A single-threaded scheduling unit that drives many requests cooperatively.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `EventLoop`",
    label = "missing `EventLoop` implementation",
    note = "Event loops must implement `id` and `execute`."
)]
pub trait EventLoop: Send + Sync + 'static {
    /// Identifier of this loop within its group.
    fn id(&self) -> usize;

    /// Runs `task` to completion on this loop.
    fn execute(&self, task: BoxTask);
}

/// Shared handle to the [`EventLoop`] a request is pinned to.
#[derive(Clone)]
pub struct EventLoopHandle {
    inner: Arc<dyn EventLoop>,
}

impl EventLoopHandle {
    /// Wrap an event loop in a shareable handle.
    pub fn new<L: EventLoop>(event_loop: L) -> Self {
        Self {
            inner: Arc::new(event_loop),
        }
    }

    /// Wrap an already shared event loop.
    pub fn from_arc(inner: Arc<dyn EventLoop>) -> Self {
        Self { inner }
    }

    /// Identifier of the underlying loop.
    pub fn id(&self) -> usize {
        self.inner.id()
    }

    /// Runs `task` on the underlying loop.
    pub fn execute<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.inner.execute(Box::pin(task));
    }

    /// Allocates a completion slot bound to this loop.
    pub fn make_promise<T: Send + 'static>(&self) -> (Promise<T>, PromiseFuture<T>) {
        let (sender, receiver) = oneshot::channel();
        let promise = Promise {
            sender,
            event_loop: self.id(),
        };
        (promise, PromiseFuture { receiver })
    }

    /// Returns a future that is already resolved with `value`.
    pub fn make_succeeded_future<T: Send + 'static>(&self, value: T) -> PromiseFuture<T> {
        let (promise, future) = self.make_promise();
        promise.succeed(value);
        future
    }

    /// Returns a future that is already resolved with `error`.
    pub fn make_failed_future<T: Send + 'static>(
        &self,
        error: impl Into<BoxError>,
    ) -> PromiseFuture<T> {
        let (promise, future) = self.make_promise();
        promise.fail(error);
        future
    }

    /// Runs `future` on this loop and returns a future of its outcome.
    pub fn submit<T, F>(&self, future: F) -> PromiseFuture<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        let (promise, result) = self.make_promise();
        self.execute(async move {
            promise.complete(future.await);
        });
        result
    }
}

impl fmt::Debug for EventLoopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoopHandle")
            .field("id", &self.id())
            .finish()
    }
}

/// Write side of a single-use completion slot.
pub struct Promise<T> {
    sender: oneshot::Sender<Result<T, BoxError>>,
    event_loop: usize,
}

impl<T> Promise<T> {
    /// Resolve the promise with a value.
    pub fn succeed(self, value: T) {
        self.complete(Ok(value));
    }

    /// Resolve the promise with a failure.
    pub fn fail(self, error: impl Into<BoxError>) {
        self.complete(Err(error.into()));
    }

    /// Resolve the promise with an outcome.
    pub fn complete(self, result: Result<T, BoxError>) {
        // A closed receiver means nobody is waiting anymore.
        let _ = self.sender.send(result);
    }

    /// Returns `true` if the waiting side has gone away.
    pub fn is_canceled(&self) -> bool {
        self.sender.is_canceled()
    }

    /// Resolves once the waiting side has gone away.
    pub fn cancellation(&mut self) -> impl Future<Output = ()> + Send + '_
    where
        T: Send,
    {
        self.sender.cancellation()
    }

    /// Identifier of the loop this promise was allocated on.
    pub fn event_loop_id(&self) -> usize {
        self.event_loop
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("event_loop", &self.event_loop)
            .finish_non_exhaustive()
    }
}

/// Read side of a single-use completion slot.
#[must_use = "futures do nothing unless polled"]
pub struct PromiseFuture<T> {
    receiver: oneshot::Receiver<Result<T, BoxError>>,
}

impl<T> Future for PromiseFuture<T> {
    type Output = Result<T, BoxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Box::new(ResponderError::PromiseDropped))),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> fmt::Debug for PromiseFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromiseFuture").finish_non_exhaustive()
    }
}
