//! # wren-std
//!
//! Standard implementations for the Wren request-dispatch engine.
//!
//! This crate provides:
//! - **Responders**: [`CallbackResponder`](responders::CallbackResponder),
//!   [`AsyncCallbackResponder`](responders::AsyncCallbackResponder)
//! - **Middleware chain**: [`MiddlewareGroup`](chain::MiddlewareGroup)
//! - **Routing**: [`RouterBuilder`](routing::RouterBuilder),
//!   [`RouterGroup`](routing::RouterGroup), [`Router`](routing::Router)
//! - **Standard middleware**: logging, timeout, headers, recovery, closures
//! - **Streaming**: [`ByteBufferStreamer`](streaming::ByteBufferStreamer),
//!   [`StreamCallback`](streaming::StreamCallback)
//! - **Execution**: [`TokioEventLoop`](event_loop::TokioEventLoop),
//!   [`EventLoopGroup`](event_loop::EventLoopGroup)
//! - **Assembly**: [`Application`](application::Application),
//!   [`Dispatcher`](application::Dispatcher)

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core contracts
pub use wren_core;

// Modules
pub mod application;
pub mod chain;
pub mod config;
pub mod environment;
pub mod event_loop;
pub mod middleware;
pub mod responders;
pub mod routing;
pub mod streaming;
pub mod testing;
