//! Deadline middleware.

use std::time::Duration;
use tokio::time::timeout;
use wren_core::{BoxError, Middleware, Next, Request, ResponderError, Response};

/// A middleware that fails with [`ResponderError::Timeout`] when the rest of
/// the chain does not complete within `duration`.
///
/// The downstream future is dropped when the deadline passes, so the caller
/// observes exactly one outcome either way.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutMiddleware {
    duration: Duration,
}

impl TimeoutMiddleware {
    /// Fail requests that take longer than `duration`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The configured deadline.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Middleware for TimeoutMiddleware {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        match timeout(self.duration, next.run(request)).await {
            Ok(result) => result,
            Err(_) => Err(Box::new(ResponderError::Timeout(self.duration))),
        }
    }
}
