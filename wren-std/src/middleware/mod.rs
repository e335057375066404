//! Standard middleware implementations.
//!
//! - [`LogRequestsMiddleware`]: access log through `tracing`
//! - [`TimeoutMiddleware`]: fails requests that take too long
//! - [`SetHeaderMiddleware`]: sets a response header on the way out
//! - [`RecoverMiddleware`]: turns downstream failures into responses
//! - [`MiddlewareFn`]: closure-backed middleware, see [`from_fn`]

mod from_fn;
mod headers;
mod logging;
mod recover;
mod timeout;

pub use from_fn::{MiddlewareFn, from_fn};
pub use headers::{HeaderMode, SetHeaderMiddleware};
pub use logging::LogRequestsMiddleware;
pub use recover::{RecoverMiddleware, status_for_error};
pub use timeout::TimeoutMiddleware;
