//! Closure-backed middleware.

use std::future::Future;
use wren_core::{BoxError, Middleware, Next, Request, Response};

/// A middleware built from an async closure taking the request and [`Next`].
///
/// ```rust,ignore
/// let stamp = from_fn(|request: Request, next: Next| async move {
///     let response = next.run(request).await?;
///     Ok::<_, BoxError>(response.with_header("x-served-by", HeaderValue::from_static("wren")))
/// });
/// ```
#[derive(Clone)]
pub struct MiddlewareFn<F> {
    f: F,
}

impl<F, Fut> Middleware for MiddlewareFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    fn apply(
        &self,
        request: Request,
        next: Next,
    ) -> impl Future<Output = Result<Response, BoxError>> + Send {
        (self.f)(request, next)
    }
}

/// Build a middleware from an async closure.
pub fn from_fn<F, Fut>(f: F) -> MiddlewareFn<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, BoxError>> + Send,
{
    MiddlewareFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chain::MiddlewareGroup,
        testing::{OrderLog, StaticResponder, test_request},
    };
    use wren_core::{
        Responder, shared,
        http::{Method, StatusCode},
    };

    #[tokio::test]
    async fn test_closure_wraps_next() {
        let log = OrderLog::new();
        let recorder = log.clone();
        let mut group = MiddlewareGroup::new();
        group.add(from_fn(move |request: Request, next: Next| {
            let log = recorder.clone();
            async move {
                log.push("before");
                let mut response = next.run(request).await?;
                log.push("after");
                *response.status_mut() = StatusCode::CREATED;
                Ok::<_, BoxError>(response)
            }
        }));

        let response = group
            .construct_responder(shared(
                StaticResponder::new(StatusCode::OK).recording("H", log.clone()),
            ))
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(log.entries(), ["before", "H", "after"]);
    }
}
