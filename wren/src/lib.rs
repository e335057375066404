//! # wren - Asynchronous HTTP Request Dispatch
//!
//! `wren` turns an incoming request into an asynchronously produced
//! response. Every stage of dispatch (root middleware, group middleware,
//! route handler) speaks the same [`Responder`] contract, so no stage needs
//! to know the concrete type of the stage below it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wren::prelude::*;
//!
//! let mut app = Application::new();
//! app.middlewares.add(LogRequestsMiddleware);
//! app.router.get("/hello", callback(|request: Request| {
//!     let body = request.allocator().buffer_from_str("GET: Hello");
//!     request.event_loop().make_succeeded_future(Response::ok().with_body(body))
//! }));
//! app.router
//!     .group()
//!     .add(RequireToken)
//!     .post("/echo", async_callback(|request: Request| async move {
//!         let event_loop = request.event_loop().clone();
//!         request.into_body().collect(&event_loop).await
//!     }));
//!
//! let dispatcher = app.build()?;
//! let response = dispatcher.dispatch(request).await?;
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): access log and dispatch spans
//! - `tower`: adapters between [`Responder`] and `tower::Service`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use wren_core::{
    // Body
    BodyStreamer,
    // Errors
    BoxError,
    BoxBodyStreamer,
    BoxTask,
    ByteBufferAllocator,
    DynBodyStreamer,
    DynMiddleware,
    DynResponder,
    // Execution context
    EventLoop,
    EventLoopHandle,
    IntoResponse,
    // Middleware
    Middleware,
    Next,
    Parameters,
    Promise,
    PromiseFuture,
    // Request / Response
    Request,
    RequestBody,
    // Responder
    Responder,
    ResponderError,
    Response,
    ResponseBody,
    ResponseFuture,
    RouterError,
    SharedMiddleware,
    SharedResponder,
    StreamChunk,
    StreamError,
    WrenError,
    bytes,
    collect_stream,
    http,
    shared,
};

pub use wren_std::{
    application::{Application, Dispatcher},
    chain::{MiddlewareGroup, MiddlewareResponder},
    config::{ConfigError, Configuration},
    environment::Environment,
    event_loop::{EventLoopGroup, TokioEventLoop},
    responders::{AsyncCallbackResponder, CallbackResponder, async_callback, callback},
    routing::{NotFoundResponder, RouteRegistrar, Router, RouterBuilder, RouterGroup},
    streaming::{ByteBufferStreamer, DEFAULT_CHUNK_SIZE, StreamCallback, stream_request_body},
};

/// Environment keys read by [`Configuration::from_environment`].
pub mod config {
    pub use wren_std::config::{
        EVENT_LOOPS_KEY, LOG_REQUESTS_KEY, REQUEST_TIMEOUT_KEY, STREAM_CHUNK_SIZE_KEY,
    };
}

/// Standard middleware implementations.
pub mod middleware {
    pub use wren_std::middleware::{
        HeaderMode, LogRequestsMiddleware, MiddlewareFn, RecoverMiddleware, SetHeaderMiddleware,
        TimeoutMiddleware, from_fn, status_for_error,
    };
}

/// Testing utilities.
pub mod testing {
    pub use wren_std::testing::{
        CompletionCounter, FailingResponder, OrderLog, RecordingMiddleware, StaticResponder,
        collect_body, test_request,
    };
}

#[cfg(feature = "tower")]
pub mod tower;

/// Prelude module - common imports for Wren.
///
/// # Usage
///
/// ```rust,ignore
/// use wren::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Assembly
        Application,
        // Errors
        BoxError,
        Dispatcher,
        EventLoopHandle,
        IntoResponse,
        // Core traits
        Middleware,
        Next,
        Request,
        RequestBody,
        Responder,
        Response,
        ResponseBody,
        RouteRegistrar,
        StreamChunk,
        // Responders
        async_callback,
        callback,
        http::{Method, StatusCode},
        middleware::{LogRequestsMiddleware, SetHeaderMiddleware, from_fn},
    };
}
