//! Outbound response value and conversion traits.

use crate::body::ResponseBody;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE, header::IntoHeaderName};

/// Status, headers and body produced for one request.
///
/// Responses are built fresh per request and owned by whoever currently
/// holds them, so a middleware may freely rewrite the status and headers of
/// the response it received from `next` before passing it outward.
#[derive(Debug, Default)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl Response {
    /// A response with the given status, no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// A `200 OK` response with an empty body.
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// Replace the status.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Set a header, replacing any existing values for that name.
    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Mutable response status.
    pub fn status_mut(&mut self) -> &mut StatusCode {
        &mut self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable response headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Response body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// Mutable response body.
    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    /// Consume the response, returning its body.
    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    /// Split the response into status, headers and body.
    pub fn into_parts(self) -> (StatusCode, HeaderMap, ResponseBody) {
        (self.status, self.headers, self.body)
    }
}

/// Trait for converting a handler's output into a [`Response`].
///
/// # Default Implementations
///
/// - `Response` → As is
/// - `StatusCode` → That status, empty body
/// - `()` → `200 OK`, empty body
/// - `Bytes`, `Vec<u8>`, `ResponseBody` → `200 OK` with that body
/// - `String`, `&'static str` → `200 OK`, `text/plain` body
/// - `(StatusCode, T)` → `T`'s response with the status replaced
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "IntoResponse must implement the `into_response` method."
)]
pub trait IntoResponse {
    /// Convert the output into a response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        Response::new(self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        Response::ok()
    }
}

impl IntoResponse for ResponseBody {
    fn into_response(self) -> Response {
        Response::ok().with_body(self)
    }
}

impl IntoResponse for Bytes {
    fn into_response(self) -> Response {
        Response::ok().with_body(self)
    }
}

impl IntoResponse for Vec<u8> {
    fn into_response(self) -> Response {
        Response::ok().with_body(self)
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        text_response(ResponseBody::from(self))
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        text_response(ResponseBody::from(self))
    }
}

impl<T: IntoResponse> IntoResponse for (StatusCode, T) {
    fn into_response(self) -> Response {
        self.1.into_response().with_status(self.0)
    }
}

fn text_response(body: ResponseBody) -> Response {
    Response::ok()
        .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
        .with_body(body)
}
