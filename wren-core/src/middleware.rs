//! # Middleware
//!
//! A middleware wraps the rest of the chain. It receives the request and a
//! [`Next`] handle and must itself produce the outcome, either directly or by
//! delegating through [`Next::run`].
//!
//! - Code before `next.run(..)` executes on the way in, outermost first.
//! - Code after `next.run(..)` observes the response (or failure) on the way
//!   out, innermost first.
//! - Returning without calling `next` short-circuits the chain; nothing
//!   downstream runs.
//! - Matching on the `Err` returned by `next` recovers from downstream
//!   failures. Nothing is recovered unless a middleware opts in.
//!
//! Middleware instances are shared by every request and every worker, so they
//! must be stateless or internally synchronised.

use crate::{
    error::BoxError,
    request::Request,
    responder::{ResponseFuture, SharedResponder},
    response::Response,
};
use std::{fmt, future::Future, sync::Arc};

/// Logic that wraps the rest of a responder chain.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Middleware`",
    label = "missing `Middleware` implementation",
    note = "Middleware must implement `apply`, producing a response directly or via `next.run`."
)]
pub trait Middleware: Send + Sync + 'static {
    /// Handle `request`, optionally delegating to `next`.
    fn apply(
        &self,
        request: Request,
        next: Next,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Middleware`].
pub trait DynMiddleware: Send + Sync + 'static {
    /// Handle `request` (dynamic dispatch version).
    fn apply_dyn(&self, request: Request, next: Next) -> ResponseFuture<'_>;
}

impl<T: Middleware> DynMiddleware for T {
    fn apply_dyn(&self, request: Request, next: Next) -> ResponseFuture<'_> {
        Box::pin(self.apply(request, next))
    }
}

/// A type-erased middleware shared across chains.
pub type SharedMiddleware = Arc<dyn DynMiddleware>;

impl Middleware for Arc<dyn DynMiddleware> {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        self.as_ref().apply_dyn(request, next).await
    }
}

/// Handle to the rest of the chain below a middleware.
///
/// `run` consumes the handle: a middleware may delegate at most once.
pub struct Next {
    responder: SharedResponder,
}

impl Next {
    /// Wrap the responder that follows a middleware.
    pub fn new(responder: SharedResponder) -> Self {
        Self { responder }
    }

    /// Delegate `request` to the rest of the chain.
    pub async fn run(self, request: Request) -> Result<Response, BoxError> {
        self.responder.as_ref().respond_dyn(request).await
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").finish_non_exhaustive()
    }
}
