//! Tower integration for wren.
//!
//! This module provides adapters between wren's [`Responder`] and tower's
//! `Service`:
//!
//! - [`ResponderService`]: use a responder wherever a `Service<Request>` is expected
//! - [`ServiceResponder`]: register a tower service (and its layers) as a route
//!
//! # Example
//!
//! ```rust,ignore
//! use tower::ServiceBuilder;
//! use wren::tower::{ResponderService, ServiceResponder};
//!
//! let service = ServiceBuilder::new()
//!     .map_response(|response: Response| response.with_status(StatusCode::CREATED))
//!     .service(ResponderService::new(handler));
//! app.router.post("/items", ServiceResponder::new(service));
//! ```

use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use ::tower::{Service, ServiceExt};
use wren_core::{BoxError, Request, Responder, Response};

// ============================================================================
// Responder → Service Adapter
// ============================================================================

/// Wraps a [`Responder`] as a tower `Service<Request>`.
///
/// Responders carry no backpressure, so the service is always ready.
pub struct ResponderService<R> {
    responder: Arc<R>,
}

impl<R> ResponderService<R> {
    /// Wrap `responder`.
    pub fn new(responder: R) -> Self {
        Self {
            responder: Arc::new(responder),
        }
    }

    /// The wrapped responder.
    pub fn inner(&self) -> &R {
        &self.responder
    }
}

impl<R> Clone for ResponderService<R> {
    fn clone(&self) -> Self {
        Self {
            responder: Arc::clone(&self.responder),
        }
    }
}

impl<R: Responder> Service<Request> for ResponderService<R> {
    type Response = Response;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Response, BoxError>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let responder = Arc::clone(&self.responder);
        Box::pin(async move { responder.respond(request).await })
    }
}

// ============================================================================
// Service → Responder Adapter
// ============================================================================

/// Wraps a tower `Service` as a [`Responder`].
///
/// The service is cloned for every request and driven to readiness before
/// it is called.
#[derive(Clone)]
pub struct ServiceResponder<S> {
    service: S,
}

impl<S> ServiceResponder<S> {
    /// Wrap `service`.
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// The wrapped service.
    pub fn inner(&self) -> &S {
        &self.service
    }
}

impl<S> Responder for ServiceResponder<S>
where
    S: Service<Request, Response = Response, Error = BoxError> + Clone + Send + Sync + 'static,
    S::Future: Send,
{
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        self.service.clone().oneshot(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StaticResponder, test_request};
    use ::tower::ServiceBuilder;
    use wren_core::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_responder_as_service() {
        let service = ResponderService::new(StaticResponder::new(StatusCode::ACCEPTED));
        let response = service
            .oneshot(test_request(Method::GET, "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_service_as_responder() {
        let service = ::tower::service_fn(|request: Request| async move {
            Ok::<_, BoxError>(Response::new(StatusCode::OK).with_body(request.path().to_owned()))
        });
        let responder = ServiceResponder::new(service);
        let request = test_request(Method::GET, "/via-tower");
        let event_loop = request.event_loop().clone();
        let body = responder
            .respond(request)
            .await
            .unwrap()
            .into_body()
            .collect(&event_loop)
            .await
            .unwrap();
        assert_eq!(body, "/via-tower");
    }

    #[tokio::test]
    async fn test_layered_responder() {
        let service = ServiceBuilder::new()
            .map_response(|response: Response| response.with_status(StatusCode::CREATED))
            .service(ResponderService::new(StaticResponder::new(StatusCode::OK)));
        let response = ServiceResponder::new(service)
            .respond(test_request(Method::POST, "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
