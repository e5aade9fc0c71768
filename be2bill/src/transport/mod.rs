//! Transport abstraction and host failover.
//!
//! A [`Transport`] delivers one form-encoded POST to one URL and enforces the
//! per-attempt timeout. [`post_with_failover`] walks the hosts of an
//! environment in order on top of it:
//!
//! - a connection error moves on to the next host
//! - a non-2xx status moves on or aborts, per [`ServerErrorPolicy`]
//! - a timeout stops immediately, the request may have been executed
//! - the first 2xx response wins
//!
//! When every host fails, the error of the last one is returned.
//!
//! # Examples
//!
//! ```rust,no_run
//! use be2bill::{
//!     Environment,
//!     transport::{HttpTransport, ServerErrorPolicy, post_with_failover},
//! };
//!
//! # async fn example() -> be2bill::Result<()> {
//! let transport = HttpTransport::new()?;
//! let urls = Environment::sandbox().endpoint_urls("/front/service/rest/process");
//!
//! let body = post_with_failover(&transport, &urls, "method=payment", ServerErrorPolicy::NextHost)
//!     .await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::error::{Be2billError, Result};

pub mod config;
pub mod http;
mod sealed;

pub use config::{HttpVersion, ServerErrorPolicy, TransportConfig};
pub use http::HttpTransport;

/// Successful response of a single attempt.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status code, always in the 2xx range.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

/// Delivery of form-encoded requests to a single URL.
///
/// This trait is sealed; [`HttpTransport`] is the implementation used by the
/// clients of this crate.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// Posts `body` to `url` as `application/x-www-form-urlencoded`.
    ///
    /// # Errors
    ///
    /// - [`Be2billError::Timeout`] if the attempt exceeds
    ///   [`request_timeout`](Self::request_timeout)
    /// - [`Be2billError::ConnectionError`] if the request could not be
    ///   delivered or the response not read
    /// - [`Be2billError::ServerError`] for a non-2xx status
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        body: &'a str,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Time allowed for a single attempt.
    fn request_timeout(&self) -> Duration;
}

/// Sends `body` to each URL in order until one host answers.
///
/// Returns the body of the first successful response. No request is made
/// when `urls` is empty.
///
/// # Errors
///
/// - [`Be2billError::NoHostsConfigured`] if `urls` is empty
/// - [`Be2billError::Timeout`] as soon as one attempt times out
/// - [`Be2billError::ServerError`] immediately under
///   [`ServerErrorPolicy::Abort`]
/// - otherwise the error of the last host once every host failed
#[instrument(skip(transport, urls, body), fields(host_count = urls.len()))]
pub async fn post_with_failover<T: Transport>(
    transport: &T,
    urls: &[String],
    body: &str,
    policy: ServerErrorPolicy,
) -> Result<Vec<u8>> {
    let mut last_error = None;

    for (index, url) in urls.iter().enumerate() {
        let attempt = index + 1;
        debug!(attempt, url = %url, "sending request");

        match transport.post_form(url, body).await {
            Ok(response) => {
                debug!(attempt, status = response.status, "host answered");
                return Ok(response.body);
            }
            Err(error) if error.is_failover_candidate(policy) => {
                warn!(attempt, url = %url, error = %error, "host failed, trying next host");
                last_error = Some(error);
            }
            Err(error) => {
                warn!(attempt, url = %url, error = %error, "request failed");
                return Err(error);
            }
        }
    }

    Err(last_error.unwrap_or(Be2billError::NoHostsConfigured))
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted in-memory transport.

    use std::{
        collections::VecDeque,
        sync::{Mutex, PoisonError},
    };

    use super::*;

    /// Outcome of one scripted attempt.
    #[derive(Debug)]
    pub(crate) enum Scripted {
        Ok(&'static str),
        ServerError(u16),
        Timeout,
    }

    /// Transport replaying scripted outcomes and recording every request.
    #[derive(Debug, Default)]
    pub(crate) struct MockTransport {
        script: Mutex<VecDeque<Scripted>>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl MockTransport {
        pub(crate) fn new(script: impl IntoIterator<Item = Scripted>) -> Self {
            Self { script: Mutex::new(script.into_iter().collect()), requests: Mutex::default() }
        }

        pub(crate) fn requests(&self) -> Vec<(String, String)> {
            self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }
    }

    impl sealed::private::Sealed for MockTransport {}

    impl Transport for MockTransport {
        async fn post_form<'a>(&'a self, url: &'a str, body: &'a str) -> Result<TransportResponse> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((url.to_owned(), body.to_owned()));
            let next = self.script.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
            match next {
                Some(Scripted::Ok(body)) => {
                    Ok(TransportResponse { status: 200, body: body.as_bytes().to_vec() })
                }
                Some(Scripted::ServerError(status)) => {
                    Err(Be2billError::ServerError { url: url.to_owned(), status })
                }
                Some(Scripted::Timeout) => Err(Be2billError::Timeout),
                None => Err(Be2billError::TransportError("script exhausted".to_owned())),
            }
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(1)
        }
    }
}
