//! Application assembly.
//!
//! An [`Application`] collects root middleware and routes at build time.
//! [`Application::build`] freezes both into a [`Dispatcher`], the single
//! responder a transport hands every request to.

use crate::{
    chain::MiddlewareGroup,
    config::{ConfigError, Configuration},
    environment::Environment,
    middleware::{LogRequestsMiddleware, TimeoutMiddleware},
    routing::RouterBuilder,
    streaming::stream_request_body,
};
use std::{fmt, sync::Arc};
use wren_core::{
    BoxError, Request, RequestBody, Responder, Response, ResponseBody, SharedResponder, WrenError,
    shared,
};

/// Build-time container for root middleware and routes.
///
/// ```rust,ignore
/// let mut app = Application::new();
/// app.middlewares.add(SetHeaderMiddleware::overriding(name, value));
/// app.router.get("/hello", hello);
/// let dispatcher = app.build()?;
/// ```
pub struct Application {
    /// Root middleware, applied to every request, outermost first.
    pub middlewares: MiddlewareGroup,
    /// Route table.
    pub router: RouterBuilder,
    environment: Environment,
    configuration: Configuration,
}

impl Default for Application {
    fn default() -> Self {
        Self::with_configuration(Configuration::default())
    }
}

impl Application {
    /// An application with the default configuration and an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// An application with an explicit configuration.
    pub fn with_configuration(configuration: Configuration) -> Self {
        Self {
            middlewares: MiddlewareGroup::new(),
            router: RouterBuilder::new(),
            environment: Environment::new(),
            configuration,
        }
    }

    /// An application configured from `environment`.
    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let configuration = Configuration::from_environment(&environment)?;
        Ok(Self {
            environment,
            ..Self::with_configuration(configuration)
        })
    }

    /// The injected environment.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// The active configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Freeze routes and middleware into a [`Dispatcher`].
    ///
    /// The access log and the request deadline, when configured, wrap the
    /// root middleware.
    pub fn build(self) -> Result<Dispatcher, WrenError> {
        let router = self.router.build()?;

        let mut chain = MiddlewareGroup::new();
        if self.configuration.log_requests() {
            chain.add(LogRequestsMiddleware);
        }
        if let Some(duration) = self.configuration.request_timeout() {
            chain.add(TimeoutMiddleware::new(duration));
        }
        chain.extend(&self.middlewares);

        #[cfg(feature = "tracing")]
        tracing::debug!(middlewares = chain.len(), "dispatcher built");

        Ok(Dispatcher {
            responder: chain.construct_responder(shared(router)),
            configuration: Arc::new(self.configuration),
            environment: self.environment,
        })
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("middlewares", &self.middlewares)
            .field("router", &self.router)
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

/// The frozen dispatch graph: root chain, groups and routes.
///
/// Cheap to clone and safe to share across event loops.
#[derive(Clone)]
pub struct Dispatcher {
    responder: SharedResponder,
    configuration: Arc<Configuration>,
    environment: Environment,
}

impl Dispatcher {
    /// Run `request` through the root chain and the router.
    pub async fn dispatch(&self, request: Request) -> Result<Response, BoxError> {
        #[cfg(feature = "tracing")]
        {
            use tracing::Instrument;
            let span = tracing::info_span!(
                "dispatch",
                method = %request.method(),
                path = %request.path(),
                event_loop = request.event_loop().id(),
            );
            self.responder
                .as_ref()
                .respond_dyn(request)
                .instrument(span)
                .await
        }
        #[cfg(not(feature = "tracing"))]
        {
            self.responder.as_ref().respond_dyn(request).await
        }
    }

    /// Turn a request body into a streaming response body, using the
    /// configured chunk size.
    pub fn stream_body(&self, body: RequestBody) -> ResponseBody {
        stream_request_body(body, self.configuration.stream_chunk_size())
    }

    /// The configuration the dispatcher was built with.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// The environment the dispatcher was built with.
    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl Responder for Dispatcher {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        self.dispatch(request).await
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}
