//! Form client.
//!
//! Builds signed HTML forms that send the customer to the be2bill hosted
//! payment page. The form posts to the first host of the environment.

mod renderer;

use std::sync::Arc;

use tracing::debug;

pub use renderer::{FORM_PATH, HtmlOptions, HtmlRenderer, Renderer};

use crate::{
    amount::{Amount, SingleAmount},
    constants::{API_VERSION, operation, param},
    environment::{Credentials, PRODUCTION_URLS, SANDBOX_URLS},
    error::{Be2billError, Result},
    hash::{self, Hasher, Sha256Hasher},
    params::Params,
};

/// Client building payment and authorization buttons.
///
/// # Examples
///
/// ```
/// use be2bill::{
///     FormClient,
///     amount::SingleAmount,
///     form::HtmlOptions,
///     params::Params,
/// };
///
/// let client = FormClient::sandbox("test", "password");
/// let button = client.build_authorization_form_button(
///     SingleAmount(15235),
///     "order_1412327697",
///     "6328_john.smith@example.org",
///     "Fashion jacket",
///     &HtmlOptions::new(),
///     Params::new(),
/// );
///
/// assert!(button.contains(
///     r#"<input type="hidden" name="HASH" value="01ccdb73b31de50567aa699642dad2e566a9c676d74d359efb4c849c13012427" />"#
/// ));
/// ```
#[derive(Debug, Clone)]
pub struct FormClient<R = HtmlRenderer> {
    credentials: Credentials,
    renderer: R,
    hasher: Arc<dyn Hasher>,
}

impl FormClient<HtmlRenderer> {
    /// Creates a client rendering forms for the primary host of the
    /// credentials' environment.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::NoHostsConfigured`] if the environment is empty.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let renderer = credentials
            .environment()
            .primary()
            .map(HtmlRenderer::new)
            .ok_or(Be2billError::NoHostsConfigured)?;
        Ok(Self::with_renderer(credentials, renderer))
    }

    /// Creates a client for the sandbox environment.
    #[must_use]
    pub fn sandbox(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_renderer(
            Credentials::sandbox(identifier, password),
            HtmlRenderer::new(SANDBOX_URLS[0]),
        )
    }

    /// Creates a client for the production environment.
    #[must_use]
    pub fn production(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self::with_renderer(
            Credentials::production(identifier, password),
            HtmlRenderer::new(PRODUCTION_URLS[0]),
        )
    }
}

impl<R: Renderer> FormClient<R> {
    /// Creates a client with a custom renderer.
    #[must_use]
    pub fn with_renderer(credentials: Credentials, renderer: R) -> Self {
        Self { credentials, renderer, hasher: Arc::new(Sha256Hasher) }
    }

    /// Replaces the request hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl Hasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Credentials used to sign forms.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds a payment button.
    ///
    /// The amount may be immediate or a schedule of dated charges.
    #[must_use]
    pub fn build_payment_form_button(
        &self,
        amount: &Amount,
        order_id: &str,
        client_id: &str,
        description: &str,
        html: &HtmlOptions,
        options: Params,
    ) -> String {
        let mut params = options;
        amount.apply_to(&mut params);
        self.build_process_button(operation::PAYMENT, order_id, client_id, description, html, params)
    }

    /// Builds an authorization button.
    #[must_use]
    pub fn build_authorization_form_button(
        &self,
        amount: SingleAmount,
        order_id: &str,
        client_id: &str,
        description: &str,
        html: &HtmlOptions,
        options: Params,
    ) -> String {
        let mut params = options;
        params.insert(param::AMOUNT, amount);
        self.build_process_button(
            operation::AUTHORIZATION,
            order_id,
            client_id,
            description,
            html,
            params,
        )
    }

    fn build_process_button(
        &self,
        operation_type: &str,
        order_id: &str,
        client_id: &str,
        description: &str,
        html: &HtmlOptions,
        mut params: Params,
    ) -> String {
        params.insert(param::IDENTIFIER, self.credentials.identifier());
        params.insert(param::OPERATION_TYPE, operation_type);
        params.insert(param::ORDER_ID, order_id);
        params.insert(param::CLIENT_IDENT, client_id);
        params.insert(param::DESCRIPTION, description);
        params.insert(param::VERSION, API_VERSION);
        hash::sign(self.hasher.as_ref(), self.credentials.password(), &mut params);

        debug!(operation = operation_type, order_id, field_count = params.len(), "rendering form");
        self.renderer.render(&params, html)
    }
}
