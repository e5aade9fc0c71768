//! Error types for the be2bill client.
//!
//! Every fallible operation in this crate returns [`Result<T>`], whose error
//! type is [`Be2billError`]. Errors are never logged and swallowed inside the
//! library; they propagate to the caller of the operation.
//!
//! # Error Categories
//!
//! - **Routing errors** ([`Be2billError::NoHostsConfigured`]): the environment has no hosts
//! - **Network errors** ([`Be2billError::Timeout`], [`Be2billError::ConnectionError`],
//!   [`Be2billError::ServerError`]): communication with a be2bill host failed
//! - **Protocol errors** ([`Be2billError::MalformedResponse`],
//!   [`Be2billError::MalformedRedirectHtml`], [`Be2billError::InvalidSignature`]): the exchanged data is not what the API defines
//! - **Input errors** ([`Be2billError::UnsupportedAmount`], [`Be2billError::InvalidAmount`],
//!   [`Be2billError::InvalidInput`]): the caller supplied unusable values
//! - **Setup errors** ([`Be2billError::ConfigError`], [`Be2billError::TransportError`])
//!
//! # Examples
//!
//! ```
//! use be2bill::error::{Be2billError, Result};
//!
//! fn require_order_id(order_id: &str) -> Result<&str> {
//!     if order_id.is_empty() {
//!         return Err(Be2billError::InvalidInput("order id must not be empty".to_owned()));
//!     }
//!     Ok(order_id)
//! }
//!
//! assert!(require_order_id("").is_err());
//! ```

use thiserror::Error;

use crate::transport::ServerErrorPolicy;

/// Result type alias for be2bill operations.
pub type Result<T> = std::result::Result<T, Be2billError>;

/// Errors that can occur while building, signing or sending be2bill requests.
///
/// # Error Recovery
///
/// - [`ConnectionError`](Self::ConnectionError) and [`ServerError`](Self::ServerError) are
///   already retried on the remaining hosts of the environment before they reach the caller
/// - [`Timeout`](Self::Timeout) is never retried: the operation may have been executed
///   server-side, check its status before sending it again
/// - Input and setup errors must be fixed by the caller
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum Be2billError {
    /// The environment holds no host URL.
    ///
    /// Returned before any network activity takes place.
    #[error("no URL provided")]
    NoHostsConfigured,

    /// No host answered within the configured request timeout.
    ///
    /// The remaining hosts are not tried: the request may have reached the
    /// server, and sending it twice could execute the operation twice.
    #[error("timeout")]
    Timeout,

    /// The request could not be delivered to a host.
    ///
    /// Common causes include DNS resolution failures, refused connections and
    /// connections reset before a complete response was read. When every host
    /// fails this way, the error of the last host is returned.
    #[error("connection to {url} failed: {source}")]
    ConnectionError {
        /// URL of the host that failed.
        url: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// A host answered with a non-success HTTP status.
    ///
    /// Whether the next host is tried depends on the
    /// [`ServerErrorPolicy`](crate::transport::ServerErrorPolicy) of the client.
    #[error("server {url} returned HTTP status {status}")]
    ServerError {
        /// URL of the host that answered.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body is not a JSON object.
    ///
    /// Always fatal and never retried on another host.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// The `REDIRECTHTML` field of a result is not base64-encoded UTF-8.
    #[error("malformed REDIRECTHTML: {0}")]
    MalformedRedirectHtml(String),

    /// The `HASH` parameter of a received parameter set does not match.
    ///
    /// Raised by [`verify`](crate::hash::verify) when checking notifications
    /// sent by be2bill to the merchant.
    #[error("invalid signature")]
    InvalidSignature,

    /// The amount kind is not accepted by the requested operation.
    ///
    /// Only payments accept fragmented amounts; every other operation
    /// requires a single immediate amount.
    #[error("unsupported amount kind for this operation: {0}")]
    UnsupportedAmount(String),

    /// An amount could not be built from the given values.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A request input was rejected before sending.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The client configuration is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::error::Be2billError;
    ///
    /// let err = Be2billError::ConfigError("identifier must not be empty".to_owned());
    /// assert!(err.to_string().contains("invalid configuration"));
    /// ```
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// The transport could not be set up or an attempt task failed.
    #[error("transport error: {0}")]
    TransportError(String),
}

impl Be2billError {
    /// Returns `true` for errors raised by the transport layer.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Timeout | Self::ConnectionError { .. } | Self::ServerError { .. })
    }

    /// Returns `true` if a request that failed with this error should be sent
    /// to the next host of the environment.
    ///
    /// Connection errors always fail over, server errors only under
    /// [`ServerErrorPolicy::NextHost`]. Timeouts and every other error stop
    /// the failover loop.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::{Be2billError, transport::ServerErrorPolicy};
    ///
    /// let error = Be2billError::ServerError { url: "https://a".to_owned(), status: 503 };
    /// assert!(error.is_failover_candidate(ServerErrorPolicy::NextHost));
    /// assert!(!error.is_failover_candidate(ServerErrorPolicy::Abort));
    /// assert!(!Be2billError::Timeout.is_failover_candidate(ServerErrorPolicy::NextHost));
    /// ```
    #[must_use]
    pub const fn is_failover_candidate(&self, policy: ServerErrorPolicy) -> bool {
        match self {
            Self::ConnectionError { .. } => true,
            Self::ServerError { .. } => matches!(policy, ServerErrorPolicy::NextHost),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Be2billError::NoHostsConfigured.to_string(), "no URL provided");
        assert_eq!(Be2billError::Timeout.to_string(), "timeout");
        assert_eq!(Be2billError::InvalidSignature.to_string(), "invalid signature");
    }

    #[test]
    fn test_server_error_display() {
        let error = Be2billError::ServerError { url: "https://a.example".to_owned(), status: 500 };
        assert_eq!(error.to_string(), "server https://a.example returned HTTP status 500");
    }

    #[test]
    fn test_malformed_response_from_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("<b>Fatal error</b>").unwrap_err();
        let error = Be2billError::from(json_error);
        assert!(matches!(error, Be2billError::MalformedResponse(_)));
        assert!(error.to_string().starts_with("malformed response"));
    }

    #[test]
    fn test_unsupported_amount_message() {
        let error = Be2billError::UnsupportedAmount("fragmented".to_owned());
        assert_eq!(error.to_string(), "unsupported amount kind for this operation: fragmented");
    }

    #[test]
    fn test_is_network() {
        assert!(Be2billError::Timeout.is_network());
        assert!(Be2billError::ServerError { url: String::new(), status: 502 }.is_network());
        assert!(!Be2billError::NoHostsConfigured.is_network());
        assert!(!Be2billError::InvalidSignature.is_network());
    }

    #[test]
    fn test_failover_candidates() {
        let server_error = Be2billError::ServerError { url: String::new(), status: 500 };
        assert!(server_error.is_failover_candidate(ServerErrorPolicy::NextHost));
        assert!(!server_error.is_failover_candidate(ServerErrorPolicy::Abort));

        assert!(!Be2billError::Timeout.is_failover_candidate(ServerErrorPolicy::NextHost));
        assert!(!Be2billError::NoHostsConfigured.is_failover_candidate(ServerErrorPolicy::NextHost));
        assert!(!Be2billError::TransportError("join".to_owned())
            .is_failover_candidate(ServerErrorPolicy::NextHost));
    }
}
