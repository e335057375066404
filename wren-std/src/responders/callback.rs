//! Direct-style closure responder.

use std::future::Future;
use wren_core::{BoxError, Request, Responder, Response};

/// Responder that calls a closure returning the response future.
///
/// # Example
///
/// ```rust,ignore
/// let hello = CallbackResponder::new(|request: Request| {
///     let body = request.allocator().buffer_from_str("GET: Hello");
///     request.event_loop().make_succeeded_future(Response::ok().with_body(body))
/// });
/// ```
#[derive(Clone)]
pub struct CallbackResponder<F> {
    callback: F,
}

impl<F> CallbackResponder<F> {
    /// Wrap a closure.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F, Fut> Responder for CallbackResponder<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    fn respond(&self, request: Request) -> impl Future<Output = Result<Response, BoxError>> + Send {
        (self.callback)(request)
    }
}

/// Shorthand for [`CallbackResponder::new`].
pub fn callback<F, Fut>(callback: F) -> CallbackResponder<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    CallbackResponder::new(callback)
}
