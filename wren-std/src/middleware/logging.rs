//! Access log middleware.

use wren_core::{BoxError, Middleware, Next, Request, Response};

/// A middleware that logs every request and its outcome.
///
/// Emits one `info` event per response and one `warn` event per failure,
/// with the method, path and elapsed time. Without the `tracing` feature
/// it only delegates.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRequestsMiddleware;

impl Middleware for LogRequestsMiddleware {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        #[cfg(feature = "tracing")]
        {
            let method = request.method().clone();
            let path = request.path().to_owned();
            let started = std::time::Instant::now();
            let result = next.run(request).await;
            let elapsed = started.elapsed();
            match &result {
                Ok(response) => tracing::info!(
                    %method,
                    %path,
                    status = response.status().as_u16(),
                    ?elapsed,
                    "request completed"
                ),
                Err(error) => tracing::warn!(%method, %path, %error, ?elapsed, "request failed"),
            }
            result
        }
        #[cfg(not(feature = "tracing"))]
        {
            next.run(request).await
        }
    }
}
