//! be2bill: client for the be2bill payment API
//!
//! This crate signs and sends requests to the be2bill payment gateway. It
//! covers the two integration styles the gateway offers:
//!
//! - **Forms**: a signed HTML `<form>` that sends the customer to the hosted
//!   payment page, built by [`FormClient`]
//! - **DirectLink**: signed server-to-server calls (payments, captures,
//!   refunds, exports...), sent by [`DirectLinkClient`] with failover across
//!   the hosts of the environment
//!
//! Both rely on the same request signature: every parameter except `HASH`,
//! sorted by name and wrapped in the merchant password, hashed with SHA-256.
//! The same signature lets merchants check notifications sent by be2bill,
//! see [`hash::verify`].
//!
//! # Architecture
//!
//! ```text
//!  ┌────────────┐   ┌──────────────────┐
//!  │ FormClient │   │ DirectLinkClient │
//!  └─────┬──────┘   └────────┬─────────┘
//!        │ sign              │ sign
//!  ┌─────▼───────────────────▼──────┐
//!  │   hash (SHA-256 over Params)   │
//!  └─────┬───────────────────┬──────┘
//!        │ render            │ post_with_failover
//!  ┌─────▼──────┐   ┌────────▼─────────┐
//!  │ HTML form  │   │ Transport (HTTP) │──▶ host 1, host 2, ...
//!  └────────────┘   └──────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## 1. Render a payment button
//!
//! ```
//! use be2bill::{FormClient, amount::Amount, form::HtmlOptions, params::Params};
//!
//! let client = FormClient::sandbox("MERCHANT", "password");
//! let html = client.build_payment_form_button(
//!     &Amount::from(be2bill::amount::SingleAmount(1500)),
//!     "order_42",
//!     "client_7",
//!     "Fashion jacket",
//!     &HtmlOptions::new().with_submit_attribute("value", "Pay"),
//!     Params::new(),
//! );
//!
//! assert!(html.starts_with("<form method=\"post\""));
//! assert!(html.contains("name=\"HASH\""));
//! ```
//!
//! ## 2. Capture an authorization
//!
//! ```rust,no_run
//! use be2bill::{DirectLinkClient, params::Params};
//!
//! # async fn example() -> be2bill::Result<()> {
//! let client = DirectLinkClient::production("MERCHANT", "password")?;
//! let result = client.capture("A1234", "order_42", "Shipped", Params::new()).await?;
//!
//! println!("{} {}", result.exec_code(), result.message());
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Check a notification
//!
//! ```
//! use be2bill::{hash, params::Params};
//!
//! let mut notification = Params::new().with("TRANSACTIONID", "A1234").with("EXECCODE", "0000");
//! hash::sign(&hash::Sha256Hasher, "password", &mut notification);
//!
//! assert!(hash::verify("password", &notification).is_ok());
//! assert!(hash::verify("other", &notification).is_err());
//! ```
//!
//! # Configuration
//!
//! Clients can be built from a TOML file, see [`ClientConfig`]. Hosts,
//! timeouts and the handling of HTTP error statuses are configurable; the
//! password can be read from an environment variable.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and spans: one span per DirectLink
//! operation, a `debug` event per host attempt and a `warn` event per failed
//! host. Passwords and card data are never recorded. Installing a subscriber
//! is left to the application.
//!
//! # Error Handling
//!
//! Every fallible operation returns [`Result<T>`], see [`Be2billError`] for
//! the error categories and which of them are retried on another host.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod amount;
pub mod config;
pub mod constants;
pub mod directlink;
pub mod environment;
pub mod error;
pub mod form;
pub mod hash;
pub mod params;
pub mod transport;

pub use config::ClientConfig;
pub use directlink::DirectLinkClient;
pub use environment::{Credentials, Environment};
pub use error::{Be2billError, Result};
pub use form::FormClient;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = std::marker::PhantomData::<Be2billError>;
        let _ = std::marker::PhantomData::<DirectLinkClient>;
        let _ = std::marker::PhantomData::<FormClient>;
        let _ = std::marker::PhantomData::<ClientConfig>;
    }
}
