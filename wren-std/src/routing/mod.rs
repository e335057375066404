//! Route registration and path matching.
//!
//! Routes are registered at build time on a [`RouterBuilder`], either
//! directly or through a [`RouterGroup`] that wraps each of its routes in an
//! additional middleware prefix. [`RouterBuilder::build`] freezes the table
//! into a [`Router`], which is itself a [`Responder`].
//!
//! Paths use `matchit` syntax: `/users/{id}` captures a segment and
//! `/files/{*rest}` captures the remainder. Captured values are stored in
//! [`Request::parameters`](wren_core::Request::parameters).
//!
//! [`Responder`]: wren_core::Responder

mod group;
mod router;

pub use group::RouterGroup;
pub use router::{NotFoundResponder, Router, RouterBuilder};

use wren_core::{Responder, SharedResponder, http::Method, shared};

/// The registration surface shared by [`RouterBuilder`] and [`RouterGroup`].
pub trait RouteRegistrar {
    /// Register an already shared responder for `method` and `path`.
    fn add_route(&mut self, method: Method, path: &str, responder: SharedResponder) -> &mut Self;

    /// Register `responder` for `method` and `path`.
    fn on<R: Responder>(&mut self, method: Method, path: &str, responder: R) -> &mut Self {
        self.add_route(method, path, shared(responder))
    }

    /// Register a `GET` route.
    fn get<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::GET, path, responder)
    }

    /// Register a `POST` route.
    fn post<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::POST, path, responder)
    }

    /// Register a `PUT` route.
    fn put<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::PUT, path, responder)
    }

    /// Register a `PATCH` route.
    fn patch<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::PATCH, path, responder)
    }

    /// Register a `DELETE` route.
    fn delete<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::DELETE, path, responder)
    }

    /// Register a `HEAD` route.
    fn head<R: Responder>(&mut self, path: &str, responder: R) -> &mut Self {
        self.on(Method::HEAD, path, responder)
    }
}
