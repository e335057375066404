//! Opt-in error recovery.

use wren_core::{
    BoxError, Middleware, Next, Request, ResponderError, Response, http::StatusCode,
};

/// A middleware that hands downstream failures to a closure.
///
/// The closure may answer with a response or return the error (or another
/// one) to keep failing. Successful responses are not touched.
#[derive(Clone)]
pub struct RecoverMiddleware<F> {
    recover: F,
}

impl<F> RecoverMiddleware<F>
where
    F: Fn(BoxError) -> Result<Response, BoxError> + Send + Sync + 'static,
{
    /// Recover through `recover`.
    pub fn new(recover: F) -> Self {
        Self { recover }
    }
}

impl RecoverMiddleware<fn(BoxError) -> Result<Response, BoxError>> {
    /// Map framework errors to status-only responses with [`status_for_error`].
    ///
    /// Errors the framework did not raise keep propagating.
    pub fn status_codes() -> Self {
        Self::new(|error| match status_for_error(&error) {
            Some(status) => Ok(Response::new(status)),
            None => Err(error),
        })
    }
}

impl<F> Middleware for RecoverMiddleware<F>
where
    F: Fn(BoxError) -> Result<Response, BoxError> + Send + Sync + 'static,
{
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        next.run(request).await.or_else(|error| (self.recover)(error))
    }
}

/// The status code a framework error is conventionally answered with.
pub fn status_for_error(error: &BoxError) -> Option<StatusCode> {
    match error.downcast_ref::<ResponderError>()? {
        ResponderError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
        ResponderError::Timeout(_) => Some(StatusCode::GATEWAY_TIMEOUT),
        ResponderError::Panic(_) | ResponderError::PromiseDropped => {
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        }
        ResponderError::Custom(_) => None,
    }
}
