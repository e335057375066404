//! # Streaming Body Contract
//!
//! A body that is not fully known up front is produced through a pull
//! contract: the transport repeatedly calls [`BodyStreamer::next`], and each
//! call yields either a chunk of bytes or [`StreamChunk::End`].
//!
//! `next` takes `&mut self`, so only one pull can be in flight at a time. The
//! transport may interleave unrelated work between pulls; a streamer must not
//! assume it is polled back-to-back.
//!
//! Request and response bodies are either empty, a single buffered byte
//! sequence, or a boxed streamer.

use crate::{error::BoxError, event_loop::EventLoopHandle};
use bytes::{Bytes, BytesMut};
use std::{fmt, future::Future, pin::Pin};

/// Result of a single pull on a streaming body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// More bytes are available.
    Bytes(Bytes),
    /// The stream is exhausted; no chunk follows.
    End,
}

impl StreamChunk {
    /// Returns `true` for [`StreamChunk::End`].
    pub fn is_end(&self) -> bool {
        matches!(self, StreamChunk::End)
    }
}

/// A pull-driven, single-pass producer of body chunks.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `BodyStreamer`",
    label = "missing `BodyStreamer` implementation",
    note = "Streamers must implement `next`, yielding chunks until `StreamChunk::End`."
)]
pub trait BodyStreamer: Send + Sync + 'static {
    /// Pull the next chunk. Called on the request's event loop.
    fn next(
        &mut self,
        event_loop: &EventLoopHandle,
    ) -> impl Future<Output = Result<StreamChunk, BoxError>> + Send;
}

/// Dynamic object-safe version of [`BodyStreamer`].
pub trait DynBodyStreamer: Send + Sync + 'static {
    /// Pull the next chunk (dynamic dispatch version).
    fn next_dyn<'a>(
        &'a mut self,
        event_loop: &'a EventLoopHandle,
    ) -> Pin<Box<dyn Future<Output = Result<StreamChunk, BoxError>> + Send + 'a>>;
}

impl<T: BodyStreamer> DynBodyStreamer for T {
    fn next_dyn<'a>(
        &'a mut self,
        event_loop: &'a EventLoopHandle,
    ) -> Pin<Box<dyn Future<Output = Result<StreamChunk, BoxError>> + Send + 'a>> {
        Box::pin(self.next(event_loop))
    }
}

/// A boxed streamer, as stored inside bodies.
pub type BoxBodyStreamer = Box<dyn DynBodyStreamer>;

/// Drains `streamer` until [`StreamChunk::End`] and concatenates the chunks.
pub async fn collect_stream(
    streamer: &mut dyn DynBodyStreamer,
    event_loop: &EventLoopHandle,
) -> Result<Bytes, BoxError> {
    let mut buffer = BytesMut::new();
    loop {
        match streamer.next_dyn(event_loop).await? {
            StreamChunk::Bytes(chunk) => buffer.extend_from_slice(&chunk),
            StreamChunk::End => return Ok(buffer.freeze()),
        }
    }
}

// ============================================================================
// Request Body
// ============================================================================

/// Body of an inbound request.
#[derive(Default)]
pub enum RequestBody {
    /// No body was sent.
    #[default]
    Empty,
    /// The whole body has been received.
    Buffer(Bytes),
    /// The body is still arriving.
    Stream(BoxBodyStreamer),
}

impl RequestBody {
    /// Wrap a streamer as a not-yet-available body.
    pub fn stream<S: BodyStreamer>(streamer: S) -> Self {
        RequestBody::Stream(Box::new(streamer))
    }

    /// The buffered bytes, if the body is fully available.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            RequestBody::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns `true` if there is no body at all.
    pub fn is_empty(&self) -> bool {
        match self {
            RequestBody::Empty => true,
            RequestBody::Buffer(bytes) => bytes.is_empty(),
            RequestBody::Stream(_) => false,
        }
    }

    /// Materialise the body, draining it if it is streamed.
    pub async fn collect(self, event_loop: &EventLoopHandle) -> Result<Bytes, BoxError> {
        match self {
            RequestBody::Empty => Ok(Bytes::new()),
            RequestBody::Buffer(bytes) => Ok(bytes),
            RequestBody::Stream(mut streamer) => {
                collect_stream(streamer.as_mut(), event_loop).await
            }
        }
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Buffer(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Buffer(Bytes::from(bytes))
    }
}

impl From<&'static str> for RequestBody {
    fn from(s: &'static str) -> Self {
        RequestBody::Buffer(Bytes::from_static(s.as_bytes()))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            RequestBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

// ============================================================================
// Response Body
// ============================================================================

/// Body of an outbound response.
#[derive(Default)]
pub enum ResponseBody {
    /// No payload.
    #[default]
    Empty,
    /// A single, fully buffered payload.
    Buffer(Bytes),
    /// A payload produced incrementally by pulling a streamer.
    Stream(BoxBodyStreamer),
}

impl ResponseBody {
    /// Wrap a streamer as a response body.
    pub fn stream<S: BodyStreamer>(streamer: S) -> Self {
        ResponseBody::Stream(Box::new(streamer))
    }

    /// Size of the payload when it is known up front.
    pub fn content_length(&self) -> Option<usize> {
        match self {
            ResponseBody::Empty => Some(0),
            ResponseBody::Buffer(bytes) => Some(bytes.len()),
            ResponseBody::Stream(_) => None,
        }
    }

    /// Returns `true` if the body is produced by a streamer.
    pub fn is_stream(&self) -> bool {
        matches!(self, ResponseBody::Stream(_))
    }

    /// Pull the next chunk of the body.
    ///
    /// A buffered body yields its bytes as one chunk; an empty one yields
    /// [`StreamChunk::End`] straight away. Once the body has ended or its
    /// streamer has failed, every further pull yields `End`.
    pub async fn next(&mut self, event_loop: &EventLoopHandle) -> Result<StreamChunk, BoxError> {
        match self {
            ResponseBody::Empty => Ok(StreamChunk::End),
            ResponseBody::Buffer(_) => match std::mem::take(self) {
                ResponseBody::Buffer(bytes) if !bytes.is_empty() => Ok(StreamChunk::Bytes(bytes)),
                _ => Ok(StreamChunk::End),
            },
            ResponseBody::Stream(streamer) => {
                let result = streamer.as_mut().next_dyn(event_loop).await;
                if !matches!(result, Ok(StreamChunk::Bytes(_))) {
                    *self = ResponseBody::Empty;
                }
                result
            }
        }
    }

    /// Drain the body into a single buffer.
    pub async fn collect(mut self, event_loop: &EventLoopHandle) -> Result<Bytes, BoxError> {
        if let ResponseBody::Buffer(bytes) = self {
            return Ok(bytes);
        }
        let mut buffer = BytesMut::new();
        loop {
            match self.next(event_loop).await? {
                StreamChunk::Bytes(chunk) => buffer.extend_from_slice(&chunk),
                StreamChunk::End => return Ok(buffer.freeze()),
            }
        }
    }
}

impl From<Bytes> for ResponseBody {
    fn from(bytes: Bytes) -> Self {
        ResponseBody::Buffer(bytes)
    }
}

impl From<Vec<u8>> for ResponseBody {
    fn from(bytes: Vec<u8>) -> Self {
        ResponseBody::Buffer(Bytes::from(bytes))
    }
}

impl From<String> for ResponseBody {
    fn from(s: String) -> Self {
        ResponseBody::Buffer(Bytes::from(s))
    }
}

impl From<&'static str> for ResponseBody {
    fn from(s: &'static str) -> Self {
        ResponseBody::Buffer(Bytes::from_static(s.as_bytes()))
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Empty => f.write_str("Empty"),
            ResponseBody::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            ResponseBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
