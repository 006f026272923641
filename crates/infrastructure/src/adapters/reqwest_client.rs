//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It resolves every request against the configured API root.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use costcheck_application::ports::{HttpClient, HttpClientError};
use costcheck_domain::{ApiBase, HttpMethod, RequestSpec, ResponseSpec};
use reqwest::{Client, Method};

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` together with the service root and the
/// per-request timeout.
pub struct ReqwestHttpClient {
    client: Client,
    base: ApiBase,
    timeout: Duration,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client for the given service root.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "costcheck/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(base: ApiBase, timeout: Duration) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("costcheck/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    /// Returns the service root.
    #[must_use]
    pub const fn base(&self) -> &ApiBase {
        &self.base
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        if error.is_connect() {
            let message = error.to_string();
            let detail = format!("{message} {}", source_chain(error)).to_lowercase();
            let host = error
                .url()
                .and_then(|u| u.host_str())
                .unwrap_or("unknown")
                .to_string();

            if detail.contains("dns") || detail.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if detail.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error.to_string())
    }
}

/// Concatenates the error's source messages; reqwest keeps the OS reason there.
fn source_chain(error: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut source = error.source();
    while let Some(e) = source {
        parts.push(e.to_string());
        source = e.source();
    }
    parts.join(": ")
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &RequestSpec) -> Result<ResponseSpec, HttpClientError> {
        let url = self.base.resolve(request);
        let timeout_ms = self.timeout_ms();
        tracing::debug!(id = %request.id, method = %request.method, %url, "http request");

        let start = Instant::now();

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpClientError::Other(format!("Failed to read body: {e}")))?
            .to_vec();

        let duration = start.elapsed();
        tracing::debug!(id = %request.id, status, ?duration, "http response");

        Ok(ResponseSpec::new(status, body, duration))
    }

    fn url_for(&self, request: &RequestSpec) -> String {
        self.base.resolve(request).to_string()
    }

    fn path_for(&self, request: &RequestSpec) -> String {
        self.base.endpoint_path(&request.path)
    }
}
