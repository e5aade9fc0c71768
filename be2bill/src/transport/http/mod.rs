//! HTTP transport implementation.
//!
//! Each attempt runs as its own tokio task performing the POST and reading
//! the whole body. The caller waits for it under a timer: if the timer fires
//! first, the task is aborted, which drops the in-flight connection.

use std::time::Duration;

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument, warn};

use super::config::{HttpVersion, TransportConfig};
use crate::{
    error::{Be2billError, Result},
    params::FORM_CONTENT_TYPE,
    transport::{Transport, TransportResponse, sealed},
};

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Cloning is cheap and shares the connection pool.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use be2bill::transport::{HttpTransport, Transport, TransportConfig};
///
/// let config = TransportConfig { timeout_secs: 5, ..TransportConfig::default() };
/// let transport = HttpTransport::with_config(&config)?;
/// assert_eq!(transport.request_timeout(), Duration::from_secs(5));
/// # Ok::<(), be2bill::Be2billError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
    http_version: HttpVersion,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Connect timeout: 10 seconds
    /// - Pool max idle per host: 10
    /// - HTTP version: negotiated
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::TransportError`] if the HTTP client cannot be
    /// created.
    pub fn new() -> Result<Self> {
        Self::with_config(&TransportConfig::default())
    }

    /// Creates an HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] if the configuration is out of
    /// bounds, or [`Be2billError::TransportError`] if the HTTP client cannot
    /// be created.
    pub fn with_config(config: &TransportConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder
            .build()
            .map_err(|e| Be2billError::TransportError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, request_timeout: config.timeout(), http_version: config.http_version })
    }

    /// Returns the transport with another per-attempt timeout.
    ///
    /// Accepts sub-second values, which the TOML configuration does not.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// HTTP version preference of the underlying client.
    #[must_use]
    pub const fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    #[instrument(skip(self, body), fields(body_len = body.len(), timeout = ?self.request_timeout))]
    async fn execute_request(&self, url: &str, body: &str) -> Result<TransportResponse> {
        let request =
            self.client.post(url).header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body.to_owned());
        let target = url.to_owned();

        let mut attempt = tokio::spawn(async move {
            let response = request.send().await.map_err(|source| connection_error(&target, source))?;

            let status = response.status();
            if !status.is_success() {
                return Err(Be2billError::ServerError { url: target, status: status.as_u16() });
            }

            let body = response.bytes().await.map_err(|source| connection_error(&target, source))?;
            Ok(TransportResponse { status: status.as_u16(), body: body.to_vec() })
        });

        match tokio::time::timeout(self.request_timeout, &mut attempt).await {
            Ok(Ok(result)) => {
                if let Ok(response) = &result {
                    debug!(status = response.status, bytes = response.body.len(), "response received");
                }
                result
            }
            Ok(Err(join_error)) => {
                Err(Be2billError::TransportError(format!("request task failed: {join_error}")))
            }
            Err(_elapsed) => {
                attempt.abort();
                warn!("request timed out, connection dropped");
                Err(Be2billError::Timeout)
            }
        }
    }
}

fn connection_error(url: &str, source: reqwest::Error) -> Be2billError {
    Be2billError::ConnectionError { url: url.to_owned(), source }
}

impl Transport for HttpTransport {
    async fn post_form<'a>(&'a self, url: &'a str, body: &'a str) -> Result<TransportResponse> {
        self.execute_request(url, body).await
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
