//! HTTP Client port

use async_trait::async_trait;
use thiserror::Error;

use costcheck_domain::{RequestSpec, ResponseSpec};

/// Errors raised before a response arrives.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The URL could not be built or parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be encoded.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// No response within the configured timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// Nothing listens on the target port.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The host name did not resolve.
    #[error("could not resolve {host}: {message}")]
    DnsError {
        /// Target host.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Redirect limit exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Limit that was exceeded.
        max: usize,
    },

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests against the service.
///
/// Implementations know where the service lives; requests only carry
/// paths relative to the API root.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if no response arrives: network failure, timeout,
    /// or a request that cannot be built.
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError>;

    /// Returns the absolute URL a request would be sent to.
    fn url_for(&self, request: &RequestSpec) -> String;

    /// Returns the absolute path of a request, e.g. `/api/about`.
    fn path_for(&self, request: &RequestSpec) -> String;
}
