//! Testing utilities for Wren.
//!
//! This module provides doubles that make testing responders, middleware and
//! streaming bodies easier.
//!
//! # Features
//!
//! - [`test_request`]: A request pinned to the ambient tokio runtime
//! - [`OrderLog`]: A shared, ordered side-effect log
//! - [`RecordingMiddleware`]: Records `in`/`out`/`err` around `next`
//! - [`StaticResponder`]: Answers every request with the same status and body
//! - [`FailingResponder`]: Fails every request
//! - [`CompletionCounter`]: Counts how often the inner chain completed

use crate::event_loop::TokioEventLoop;
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};
use wren_core::{
    BoxError, EventLoopHandle, Middleware, Next, Request, Responder, ResponderError, Response,
    bytes::Bytes,
    http::{Method, StatusCode, Uri},
};

// ============================================================================
// Requests and Bodies
// ============================================================================

/// A request with no headers or body, pinned to the ambient tokio runtime.
///
/// # Panics
///
/// Panics if `uri` is not a valid URI, or when called outside a tokio runtime.
pub fn test_request(method: Method, uri: &str) -> Request {
    let uri: Uri = uri.parse().expect("test request uri");
    Request::new(method, uri, TokioEventLoop::current())
}

/// Drain a response body into a single buffer.
pub async fn collect_body(
    response: Response,
    event_loop: &EventLoopHandle,
) -> Result<Bytes, BoxError> {
    response.into_body().collect(event_loop).await
}

// ============================================================================
// Order Log
// ============================================================================

/// A shared, append-only log of side effects.
#[derive(Clone, Default)]
pub struct OrderLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl OrderLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.into());
    }

    /// A copy of every entry, in order.
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

// ============================================================================
// Recording Middleware
// ============================================================================

/// A middleware that logs `{name}:in` before delegating, and `{name}:out` or
/// `{name}:err` once the rest of the chain has completed.
#[derive(Clone)]
pub struct RecordingMiddleware {
    name: &'static str,
    log: OrderLog,
}

impl RecordingMiddleware {
    /// Record into `log` under `name`.
    pub fn new(name: &'static str, log: OrderLog) -> Self {
        Self { name, log }
    }
}

impl Middleware for RecordingMiddleware {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        self.log.push(format!("{}:in", self.name));
        let result = next.run(request).await;
        let suffix = if result.is_ok() { "out" } else { "err" };
        self.log.push(format!("{}:{suffix}", self.name));
        result
    }
}

// ============================================================================
// Responders
// ============================================================================

/// A responder that answers every request with the same status and body.
#[derive(Clone)]
pub struct StaticResponder {
    status: StatusCode,
    body: Bytes,
    log: Option<(&'static str, OrderLog)>,
}

impl StaticResponder {
    /// Answer with `status` and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: Bytes::new(),
            log: None,
        }
    }

    /// Answer with this body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Log `name` into `log` every time a request is answered.
    pub fn recording(mut self, name: &'static str, log: OrderLog) -> Self {
        self.log = Some((name, log));
        self
    }
}

impl Responder for StaticResponder {
    async fn respond(&self, _request: Request) -> Result<Response, BoxError> {
        if let Some((name, log)) = &self.log {
            log.push(*name);
        }
        Ok(Response::new(self.status).with_body(self.body.clone()))
    }
}

/// A responder that fails every request.
pub struct FailingResponder {
    make_error: Box<dyn Fn(&Request) -> BoxError + Send + Sync>,
}

impl FailingResponder {
    /// Fail with a plain message.
    pub fn new(message: &'static str) -> Self {
        Self {
            make_error: Box::new(move |_| message.into()),
        }
    }

    /// Fail with [`ResponderError::NotFound`].
    pub fn not_found() -> Self {
        Self {
            make_error: Box::new(|request| {
                Box::new(ResponderError::NotFound {
                    method: request.method().clone(),
                    path: request.path().to_owned(),
                })
            }),
        }
    }
}

impl Responder for FailingResponder {
    async fn respond(&self, request: Request) -> Result<Response, BoxError> {
        Err((self.make_error)(&request))
    }
}

// ============================================================================
// Completion Counter
// ============================================================================

/// A middleware that counts every completion of the chain below it.
///
/// Each outcome is counted once, whether it is a response or a failure.
#[derive(Clone, Default)]
pub struct CompletionCounter {
    successes: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
}

impl CompletionCounter {
    /// A counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completions with a response.
    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::SeqCst)
    }

    /// Completions with a failure.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// All completions.
    pub fn total(&self) -> usize {
        self.successes() + self.failures()
    }
}

impl Middleware for CompletionCounter {
    async fn apply(&self, request: Request, next: Next) -> Result<Response, BoxError> {
        let result = next.run(request).await;
        let counter = if result.is_ok() {
            &self.successes
        } else {
            &self.failures
        };
        counter.fetch_add(1, Ordering::SeqCst);
        result
    }
}
