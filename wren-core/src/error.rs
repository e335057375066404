//! Error types for Wren.
//!
//! Every outcome in Wren fails with a [`BoxError`], so the error value a
//! handler produces reaches the caller unchanged and can be recovered with
//! `downcast_ref`. Failures that originate inside the framework itself are
//! typed:
//!
//! - [`WrenError`] - Top-level error type
//! - [`ResponderError`] - Errors raised while producing a response
//! - [`StreamError`] - Errors raised while pulling a streaming body
//! - [`RouterError`] - Errors raised while building a router

use http::Method;
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Wren operations.
#[derive(Error, Debug)]
pub enum WrenError {
    /// An error occurred while producing a response.
    #[error("responder error: {0}")]
    Responder(#[from] ResponderError),

    /// An error occurred while streaming a body.
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),

    /// An error occurred while building the router.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised by the framework while producing a response.
#[derive(Error, Debug)]
pub enum ResponderError {
    /// The handler panicked and the panic was captured at the adapter boundary.
    #[error("responder panicked: {0}")]
    Panic(String),

    /// The downstream chain did not complete in time.
    #[error("responder timed out after {0:?}")]
    Timeout(Duration),

    /// A promise was released without ever being resolved.
    #[error("promise dropped before it was resolved")]
    PromiseDropped,

    /// No route matched the request.
    #[error("no route for {method} {path}")]
    NotFound {
        /// Request method.
        method: Method,
        /// Request path.
        path: String,
    },

    /// A custom responder error.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while pulling a streaming body.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The stream producer panicked.
    #[error("stream producer panicked: {0}")]
    Panic(String),

    /// The underlying source failed.
    #[error("stream source failed")]
    Source(#[source] BoxError),
}

/// Errors raised while building a router.
#[derive(Error, Debug)]
pub enum RouterError {
    /// A route was registered twice for the same method and path.
    #[error("route already exists: {method} {path}")]
    DuplicateRoute {
        /// Route method.
        method: Method,
        /// Route path.
        path: String,
    },

    /// The route path could not be parsed.
    #[error("invalid route {path}: {reason}")]
    InvalidRoute {
        /// Route path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },
}

impl ResponderError {
    /// Builds a [`ResponderError::Panic`] from a captured panic payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        ResponderError::Panic(panic_message(payload))
    }
}

impl StreamError {
    /// Builds a [`StreamError::Panic`] from a captured panic payload.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        StreamError::Panic(panic_message(payload))
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

// Convenience conversions
impl From<BoxError> for WrenError {
    fn from(err: BoxError) -> Self {
        WrenError::Custom(err)
    }
}

impl From<BoxError> for ResponderError {
    fn from(err: BoxError) -> Self {
        ResponderError::Custom(err)
    }
}
