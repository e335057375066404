//! # Middleware Chain
//!
//! A [`MiddlewareGroup`] is an ordered list of middleware. Folding it over a
//! terminal responder produces a single responder:
//!
//! ```text
//! [A, B, C] over H  =>  A(next = B(next = C(next = H)))
//! ```
//!
//! The fold runs from the last middleware to the first, so the first
//! registered middleware is outermost: it runs first on the way in and sees
//! the outcome last on the way out.

use std::{future::Future, sync::Arc};
use wren_core::{
    BoxError, Middleware, Next, Request, Responder, Response, SharedMiddleware, SharedResponder,
};

/// An ordered sequence of middleware.
#[derive(Clone, Default)]
pub struct MiddlewareGroup {
    middlewares: Vec<SharedMiddleware>,
}

impl MiddlewareGroup {
    /// An empty group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware. Later additions run inside earlier ones.
    pub fn add<M: Middleware>(&mut self, middleware: M) -> &mut Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Append an already shared middleware.
    pub fn add_shared(&mut self, middleware: SharedMiddleware) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Append every middleware of `other`, keeping its order.
    pub fn extend(&mut self, other: &MiddlewareGroup) -> &mut Self {
        self.middlewares.extend(other.middlewares.iter().cloned());
        self
    }

    /// Number of middleware in the group.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if the group holds no middleware.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Fold the group over `responder`, outermost first.
    pub fn construct_responder(&self, responder: SharedResponder) -> SharedResponder {
        self.middlewares
            .iter()
            .rev()
            .fold(responder, |next, middleware| {
                Arc::new(MiddlewareResponder::new(middleware.clone(), next))
            })
    }
}

impl std::fmt::Debug for MiddlewareGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareGroup")
            .field("len", &self.middlewares.len())
            .finish()
    }
}

/// One fold step: a middleware bound to the responder that follows it.
pub struct MiddlewareResponder {
    middleware: SharedMiddleware,
    next: SharedResponder,
}

impl MiddlewareResponder {
    /// Bind `middleware` in front of `next`.
    pub fn new(middleware: SharedMiddleware, next: SharedResponder) -> Self {
        Self { middleware, next }
    }
}

impl Responder for MiddlewareResponder {
    fn respond(&self, request: Request) -> impl Future<Output = Result<Response, BoxError>> + Send {
        self.middleware
            .as_ref()
            .apply_dyn(request, Next::new(self.next.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingResponder, OrderLog, RecordingMiddleware, StaticResponder, test_request};
    use wren_core::{
        ResponderError, shared,
        http::{Method, StatusCode},
    };

    struct ShortCircuit;

    impl Middleware for ShortCircuit {
        async fn apply(&self, _request: Request, _next: Next) -> Result<Response, BoxError> {
            Ok(Response::new(StatusCode::UNAUTHORIZED))
        }
    }

    #[tokio::test]
    async fn test_empty_group_is_identity() {
        let group = MiddlewareGroup::new();
        assert!(group.is_empty());
        let responder = group.construct_responder(shared(StaticResponder::new(StatusCode::CREATED)));
        let response = responder
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_registration_order_is_outermost_first() {
        let log = OrderLog::new();
        let mut group = MiddlewareGroup::new();
        group
            .add(RecordingMiddleware::new("A", log.clone()))
            .add(RecordingMiddleware::new("B", log.clone()));
        let handler = StaticResponder::new(StatusCode::OK).recording("H", log.clone());

        let responder = group.construct_responder(shared(handler));
        responder
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(log.entries(), ["A:in", "B:in", "H", "B:out", "A:out"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_handler() {
        let log = OrderLog::new();
        let mut group = MiddlewareGroup::new();
        group
            .add(RecordingMiddleware::new("A", log.clone()))
            .add(ShortCircuit)
            .add(RecordingMiddleware::new("C", log.clone()));
        let handler = StaticResponder::new(StatusCode::OK).recording("H", log.clone());

        let response = group
            .construct_responder(shared(handler))
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(log.entries(), ["A:in", "A:out"]);
    }

    #[tokio::test]
    async fn test_failure_propagates_outward() {
        let log = OrderLog::new();
        let mut group = MiddlewareGroup::new();
        group.add(RecordingMiddleware::new("A", log.clone()));

        let err = group
            .construct_responder(shared(FailingResponder::not_found()))
            .respond(test_request(Method::GET, "/"))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ResponderError>(),
            Some(ResponderError::NotFound { .. })
        ));
        assert_eq!(log.entries(), ["A:in", "A:err"]);
    }

    #[test]
    fn test_extend_keeps_order() {
        let log = OrderLog::new();
        let mut outer = MiddlewareGroup::new();
        outer.add(RecordingMiddleware::new("outer", log.clone()));
        let mut inner = MiddlewareGroup::new();
        inner.add(RecordingMiddleware::new("inner", log));
        outer.extend(&inner);
        assert_eq!(outer.len(), 2);
        assert_eq!(inner.len(), 1);
    }
}
