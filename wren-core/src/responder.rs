//! # Response Producer Contract (Responder)
//!
//! The unit of work in Wren: given a [`Request`], asynchronously produce
//! exactly one [`Response`] or exactly one failure.
//!
//! # Contract
//!
//! - The outcome is delivered through the returned future; it is never
//!   required to be ready synchronously.
//! - A responder must not block the event loop it is polled on. Blocking work
//!   is off-loaded and its result fed back through the same future.
//! - Any error raised while producing the response is returned as the
//!   `Err` outcome, carrying the original error value.
//!
//! Route handlers, middleware chains, routers and the dispatcher all
//! implement this one trait, so no stage needs to know the concrete type of
//! the stage below it.

use crate::{error::BoxError, request::Request, response::Response};
use std::{future::Future, pin::Pin, sync::Arc};

/// A boxed response future, as returned by [`DynResponder`].
pub type ResponseFuture<'a> = Pin<Box<dyn Future<Output = Result<Response, BoxError>> + Send + 'a>>;

/// Something that can take a [`Request`] and eventually yield a [`Response`].
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for zero-cost static dispatch.
/// For dynamic dispatch (chains, route tables), use [`DynResponder`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Responder`",
    label = "missing `Responder` implementation",
    note = "Responders must implement `respond`, producing one response or one error per request."
)]
pub trait Responder: Send + Sync + 'static {
    /// Produce the response to `request`.
    fn respond(&self, request: Request)
    -> impl Future<Output = Result<Response, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Responder`].
pub trait DynResponder: Send + Sync + 'static {
    /// Produce the response to `request` (dynamic dispatch version).
    fn respond_dyn(&self, request: Request) -> ResponseFuture<'_>;
}

// Blanket implementation: Any type implementing Responder implements DynResponder automatically.
impl<T: Responder> DynResponder for T {
    fn respond_dyn(&self, request: Request) -> ResponseFuture<'_> {
        Box::pin(self.respond(request))
    }
}

/// A type-erased responder shared between routes, chains and workers.
pub type SharedResponder = Arc<dyn DynResponder>;

impl Responder for Arc<dyn DynResponder> {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        self.as_ref().respond_dyn(request).await
    }
}

impl Responder for Box<dyn DynResponder> {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        self.as_ref().respond_dyn(request).await
    }
}

/// Erase a responder into a [`SharedResponder`].
pub fn shared<R: Responder>(responder: R) -> SharedResponder {
    Arc::new(responder)
}
