//! Standard [`BodyStreamer`] implementations.
//!
//! - [`ByteBufferStreamer`]: drains an in-memory buffer in bounded chunks
//! - [`StreamCallback`]: produces chunks from a closure

use std::future::Future;
use wren_core::{
    BodyStreamer, BoxError, EventLoopHandle, RequestBody, ResponseBody, StreamChunk, bytes::Bytes,
};

/// Default maximum chunk size, 32 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Drains a buffer from the front, at most `chunk_size` bytes per pull.
///
/// Splitting a [`Bytes`] is O(1), so no data is copied. Once the buffer is
/// empty every pull yields [`StreamChunk::End`].
#[derive(Debug, Clone)]
pub struct ByteBufferStreamer {
    remaining: Bytes,
    chunk_size: usize,
}

impl ByteBufferStreamer {
    /// Drain `buffer` in chunks of [`DEFAULT_CHUNK_SIZE`].
    pub fn new(buffer: Bytes) -> Self {
        Self::with_chunk_size(buffer, DEFAULT_CHUNK_SIZE)
    }

    /// Drain `buffer` in chunks of at most `chunk_size` bytes (clamped to 1).
    pub fn with_chunk_size(buffer: Bytes, chunk_size: usize) -> Self {
        Self {
            remaining: buffer,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bytes not yet handed out.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Maximum chunk size.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl BodyStreamer for ByteBufferStreamer {
    async fn next(&mut self, _event_loop: &EventLoopHandle) -> Result<StreamChunk, BoxError> {
        if self.remaining.is_empty() {
            return Ok(StreamChunk::End);
        }
        let len = self.chunk_size.min(self.remaining.len());
        Ok(StreamChunk::Bytes(self.remaining.split_to(len)))
    }
}

/// A streamer that calls a closure for every pull.
///
/// ```rust,ignore
/// let mut body = request_bytes;
/// let streamer = StreamCallback::new(move |_event_loop: &EventLoopHandle| {
///     let len = body.len().min(32 * 1024);
///     let chunk = body.split_to(len);
///     async move {
///         Ok(if chunk.is_empty() { StreamChunk::End } else { StreamChunk::Bytes(chunk) })
///     }
/// });
/// ```
pub struct StreamCallback<F> {
    callback: F,
}

impl<F> StreamCallback<F> {
    /// Wrap a chunk-producing closure.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F, Fut> BodyStreamer for StreamCallback<F>
where
    F: FnMut(&EventLoopHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<StreamChunk, BoxError>> + Send,
{
    fn next(
        &mut self,
        event_loop: &EventLoopHandle,
    ) -> impl Future<Output = Result<StreamChunk, BoxError>> + Send {
        (self.callback)(event_loop)
    }
}

/// Turn a request body into a streaming response body.
///
/// A buffered body is drained in chunks of `chunk_size`; a body that is
/// still streaming is forwarded as is.
pub fn stream_request_body(body: RequestBody, chunk_size: usize) -> ResponseBody {
    match body {
        RequestBody::Empty => ResponseBody::Empty,
        RequestBody::Buffer(bytes) => {
            ResponseBody::stream(ByteBufferStreamer::with_chunk_size(bytes, chunk_size))
        }
        RequestBody::Stream(streamer) => ResponseBody::Stream(streamer),
    }
}
