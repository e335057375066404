//! Inbound request value.

use crate::{body::RequestBody, event_loop::EventLoopHandle};
use bytes::{Bytes, BytesMut};
use http::{Extensions, HeaderMap, HeaderValue, Method, Uri, header::IntoHeaderName};

/// One inbound HTTP exchange, as handed over by the transport.
///
/// A request is pinned to the [`EventLoopHandle`] of the worker that accepted
/// its connection; everything that completes its response runs there.
#[derive(Debug)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: RequestBody,
    event_loop: EventLoopHandle,
    allocator: ByteBufferAllocator,
    parameters: Parameters,
    extensions: Extensions,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, uri: Uri, event_loop: EventLoopHandle) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            event_loop,
            allocator: ByteBufferAllocator,
            parameters: Parameters::default(),
            extensions: Extensions::new(),
        }
    }

    /// Append a header value.
    pub fn with_header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Replace the header map.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Decomposed path of the URI.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Request body.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Take the body out, leaving [`RequestBody::Empty`] behind.
    pub fn take_body(&mut self) -> RequestBody {
        std::mem::take(&mut self.body)
    }

    /// Consume the request, returning its body.
    pub fn into_body(self) -> RequestBody {
        self.body
    }

    /// The event loop this request is pinned to.
    pub fn event_loop(&self) -> &EventLoopHandle {
        &self.event_loop
    }

    /// Allocator for outgoing byte buffers.
    pub fn allocator(&self) -> &ByteBufferAllocator {
        &self.allocator
    }

    /// Parameters captured by the route that matched this request.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Mutable route parameters.
    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Typed per-request extensions.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable per-request extensions.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

/// Route parameters captured while matching a path, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// Value of the named parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Record a captured parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Iterate over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Produces outgoing byte buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteBufferAllocator;

impl ByteBufferAllocator {
    /// An empty, growable buffer with room for `capacity` bytes.
    pub fn buffer(&self, capacity: usize) -> BytesMut {
        BytesMut::with_capacity(capacity)
    }

    /// A buffer holding a copy of `bytes`.
    pub fn buffer_from_slice(&self, bytes: &[u8]) -> Bytes {
        Bytes::copy_from_slice(bytes)
    }

    /// A buffer holding the UTF-8 bytes of `s`.
    pub fn buffer_from_str(&self, s: &str) -> Bytes {
        self.buffer_from_slice(s.as_bytes())
    }
}
