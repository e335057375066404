//! Closure-backed responders.
//!
//! Two authoring styles map onto the one [`Responder`] contract:
//!
//! - [`CallbackResponder`]: the closure already returns the response future.
//!   Pure adapter, polled inline on the caller's task.
//! - [`AsyncCallbackResponder`]: the closure is a straight-line async routine.
//!   It runs as its own task on the request's event loop and feeds its
//!   outcome, or a captured panic, into a single-use promise.
//!
//! [`Responder`]: wren_core::Responder

mod async_callback;
mod callback;

pub use async_callback::{AsyncCallbackResponder, async_callback};
pub use callback::{CallbackResponder, callback};
