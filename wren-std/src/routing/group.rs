//! Scoped route groups.

use super::{RouteRegistrar, router::RouterBuilder};
use crate::chain::MiddlewareGroup;
use wren_core::{Middleware, SharedResponder, http::Method};

/// A set of routes sharing a middleware prefix.
///
/// Every route registered through the group is wrapped in the group's
/// middleware at registration time, so the effective chain of a grouped
/// route is root middleware, then group middleware, then the handler. Nested
/// groups inherit their parent's prefix, outer group first.
///
/// Middleware added after a route has been registered does not apply to that
/// route. Routes registered directly on the [`RouterBuilder`] carry none of
/// the group's middleware.
///
/// ```rust,ignore
/// let mut api = app.router.group().add(RequireToken);
/// api.get("/me", me);
/// api.group().add(AuditLog).delete("/me", delete_me);
/// ```
pub struct RouterGroup<'a> {
    router: &'a mut RouterBuilder,
    middlewares: MiddlewareGroup,
}

impl<'a> RouterGroup<'a> {
    pub(super) fn new(router: &'a mut RouterBuilder, middlewares: MiddlewareGroup) -> Self {
        Self {
            router,
            middlewares,
        }
    }

    /// Append a middleware to the group's prefix.
    pub fn add<M: Middleware>(mut self, middleware: M) -> Self {
        self.middlewares.add(middleware);
        self
    }

    /// Open a nested group whose prefix starts with this group's middleware.
    pub fn group(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self.router, self.middlewares.clone())
    }

    /// The group's middleware prefix.
    pub fn middlewares(&self) -> &MiddlewareGroup {
        &self.middlewares
    }
}

impl RouteRegistrar for RouterGroup<'_> {
    fn add_route(&mut self, method: Method, path: &str, responder: SharedResponder) -> &mut Self {
        let responder = self.middlewares.construct_responder(responder);
        self.router.add_route(method, path, responder);
        self
    }
}
