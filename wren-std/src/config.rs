//! Dispatch configuration.

use crate::{environment::Environment, streaming::DEFAULT_CHUNK_SIZE};
use std::time::Duration;
use thiserror::Error;

/// Environment key for [`Configuration::stream_chunk_size`].
pub const STREAM_CHUNK_SIZE_KEY: &str = "WREN_STREAM_CHUNK_SIZE";
/// Environment key for [`Configuration::request_timeout`], in milliseconds.
pub const REQUEST_TIMEOUT_KEY: &str = "WREN_REQUEST_TIMEOUT_MS";
/// Environment key for [`Configuration::log_requests`].
pub const LOG_REQUESTS_KEY: &str = "WREN_LOG_REQUESTS";
/// Environment key for [`Configuration::event_loops`].
pub const EVENT_LOOPS_KEY: &str = "WREN_EVENT_LOOPS";

/// Errors raised while reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A value could not be parsed.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Offending key.
        key: String,
        /// Raw value.
        value: String,
    },
}

/// Tunables for the dispatch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    stream_chunk_size: usize,
    request_timeout: Option<Duration>,
    log_requests: bool,
    event_loops: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            stream_chunk_size: DEFAULT_CHUNK_SIZE,
            request_timeout: None,
            log_requests: true,
            event_loops: 1,
        }
    }
}

impl Configuration {
    /// Defaults overridden by whatever `environment` sets.
    pub fn from_environment(environment: &Environment) -> Result<Self, ConfigError> {
        let mut configuration = Self::default();
        if let Some(size) = environment.get_parsed(STREAM_CHUNK_SIZE_KEY)? {
            configuration = configuration.with_stream_chunk_size(size);
        }
        if let Some(millis) = environment.get_parsed(REQUEST_TIMEOUT_KEY)? {
            configuration = configuration.with_request_timeout(Duration::from_millis(millis));
        }
        if let Some(enabled) = environment.get_parsed(LOG_REQUESTS_KEY)? {
            configuration = configuration.with_log_requests(enabled);
        }
        if let Some(count) = environment.get_parsed(EVENT_LOOPS_KEY)? {
            configuration = configuration.with_event_loops(count);
        }
        Ok(configuration)
    }

    /// Set the maximum chunk size used when draining buffers. Clamped to 1.
    pub fn with_stream_chunk_size(mut self, size: usize) -> Self {
        self.stream_chunk_size = size.max(1);
        self
    }

    /// Fail requests that take longer than `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enable or disable the access log.
    pub fn with_log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }

    /// Set the number of event loops. Clamped to 1.
    pub fn with_event_loops(mut self, count: usize) -> Self {
        self.event_loops = count.max(1);
        self
    }

    /// Maximum chunk size used when draining buffers.
    pub fn stream_chunk_size(&self) -> usize {
        self.stream_chunk_size
    }

    /// Per-request deadline, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    /// Whether the access log is enabled.
    pub fn log_requests(&self) -> bool {
        self.log_requests
    }

    /// Number of event loops.
    pub fn event_loops(&self) -> usize {
        self.event_loops
    }
}
