//! Matchit-backed route table.

use super::{RouteRegistrar, group::RouterGroup};
use crate::chain::MiddlewareGroup;
use matchit::{InsertError, Match};
use std::{collections::HashMap, fmt, sync::Arc};
use wren_core::{
    BoxError, Request, Responder, ResponderError, Response, RouterError, SharedResponder,
    http::Method, shared,
};

/// The default terminal producer: fails with [`ResponderError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundResponder;

impl Responder for NotFoundResponder {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        Err(Box::new(ResponderError::NotFound {
            method: request.method().clone(),
            path: request.path().to_owned(),
        }))
    }
}

struct Route {
    method: Method,
    path: String,
    responder: SharedResponder,
}

/// Collects routes before they are frozen into a [`Router`].
pub struct RouterBuilder {
    routes: Vec<Route>,
    not_found: SharedResponder,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            not_found: shared(NotFoundResponder),
        }
    }
}

impl RouterBuilder {
    /// An empty route table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the producer used when no route matches.
    pub fn not_found<R: Responder>(&mut self, responder: R) -> &mut Self {
        self.not_found = shared(responder);
        self
    }

    /// Open a group with an empty middleware prefix.
    pub fn group(&mut self) -> RouterGroup<'_> {
        RouterGroup::new(self, MiddlewareGroup::new())
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route has been registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze the table.
    ///
    /// Fails on the first path that is malformed or that collides with an
    /// earlier route for the same method.
    pub fn build(self) -> Result<Router, RouterError> {
        let mut trees: HashMap<Method, matchit::Router<SharedResponder>> = HashMap::new();
        for route in self.routes {
            let tree = trees.entry(route.method.clone()).or_default();
            tree.insert(route.path.as_str(), route.responder)
                .map_err(|err| match err {
                    InsertError::Conflict { .. } => RouterError::DuplicateRoute {
                        method: route.method,
                        path: route.path.clone(),
                    },
                    other => RouterError::InvalidRoute {
                        path: route.path.clone(),
                        reason: other.to_string(),
                    },
                })?;
        }
        Ok(Router {
            trees: Arc::new(trees),
            not_found: self.not_found,
        })
    }
}

impl RouteRegistrar for RouterBuilder {
    fn add_route(&mut self, method: Method, path: &str, responder: SharedResponder) -> &mut Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(%method, path, "registering route");
        self.routes.push(Route {
            method,
            path: path.to_owned(),
            responder,
        });
        self
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| format!("{} {}", r.method, r.path)))
            .finish()
    }
}

/// A frozen route table.
///
/// Matching is by method first, then by path. Unmatched requests are handed
/// to the not-found producer.
#[derive(Clone)]
pub struct Router {
    trees: Arc<HashMap<Method, matchit::Router<SharedResponder>>>,
    not_found: SharedResponder,
}

impl Router {
    fn resolve(&self, request: &mut Request) -> SharedResponder {
        let Some(tree) = self.trees.get(request.method()) else {
            return self.not_found.clone();
        };
        let (responder, params) = match tree.at(request.path()) {
            Ok(Match { value, params }) => {
                let params: Vec<(String, String)> = params
                    .iter()
                    .map(|(name, value)| (name.to_owned(), value.to_owned()))
                    .collect();
                (value.clone(), params)
            }
            Err(_) => return self.not_found.clone(),
        };
        for (name, value) in params {
            request.parameters_mut().insert(name, value);
        }
        responder
    }
}

impl Responder for Router {
    async fn respond(&self, mut request: Request) -> Result<Response, BoxError> {
        let responder = self.resolve(&mut request);
        responder.as_ref().respond_dyn(request).await
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("methods", &self.trees.keys().collect::<Vec<_>>())
            .finish()
    }
}
