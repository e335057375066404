//! # wren-core
//!
//! Core contracts for the Wren request-dispatch engine.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! extensions that only need to implement responders, middleware or
//! streamers, without pulling in the `wren-std` implementations.
//!
//! # Contracts
//!
//! ## Responder ([`Responder`])
//!
//! The unit of work: given a [`Request`], asynchronously yield exactly one
//! [`Response`] or exactly one failure. Route handlers, middleware chains,
//! routers and the dispatcher are all responders.
//!
//! ## Middleware ([`Middleware`])
//!
//! Wraps the rest of a chain. Receives the request and a [`Next`] handle, and
//! either answers directly (short-circuit) or delegates and post-processes
//! the outcome on the way out.
//!
//! ## Streaming Body ([`BodyStreamer`])
//!
//! A pull-driven, single-pass producer of byte chunks terminated by
//! [`StreamChunk::End`], used when a body is not fully known up front.
//!
//! ## Execution Context ([`EventLoop`])
//!
//! The single-threaded worker a request is pinned to, and the single-use
//! completion slot ([`Promise`]) used to bridge work back onto it.
//!
//! # Error Types
//!
//! - [`WrenError`] - Top-level error type
//! - [`ResponderError`] - Response production errors
//! - [`StreamError`] - Streaming body errors
//! - [`RouterError`] - Route registration errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod body;
mod error;
mod event_loop;
mod middleware;
mod request;
mod responder;
mod response;

// Re-exports
pub use body::{
    BodyStreamer, BoxBodyStreamer, DynBodyStreamer, RequestBody, ResponseBody, StreamChunk,
    collect_stream,
};
pub use error::{BoxError, ResponderError, RouterError, StreamError, WrenError};
pub use event_loop::{BoxTask, EventLoop, EventLoopHandle, Promise, PromiseFuture};
pub use middleware::{DynMiddleware, Middleware, Next, SharedMiddleware};
pub use request::{ByteBufferAllocator, Parameters, Request};
pub use responder::{DynResponder, Responder, ResponseFuture, SharedResponder, shared};
pub use response::{IntoResponse, Response};

pub use bytes;
pub use http;
