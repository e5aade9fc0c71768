//! DirectLink client.
//!
//! DirectLink operations are signed server-to-server calls. Every operation
//! follows the same recipe:
//!
//! 1. copy the caller's extra options
//! 2. stamp the operation fields, overwriting any option with the same name
//! 3. stamp `IDENTIFIER` and `VERSION`
//! 4. sign the whole map into `HASH`
//! 5. post it to each host of the environment until one answers
//!
//! # Examples
//!
//! ```rust,no_run
//! use be2bill::{
//!     DirectLinkClient,
//!     amount::SingleAmount,
//!     directlink::{Card, Customer},
//!     params::Params,
//! };
//!
//! # async fn example() -> be2bill::Result<()> {
//! let client = DirectLinkClient::sandbox("MERCHANT", "password")?;
//!
//! let card = Card::new("1111222233334444", "01-26", "123", "John Doe");
//! let customer = Customer::new("order_42", "client_7")
//!     .with_email("john.doe@example.org")
//!     .with_ip("203.0.113.7")
//!     .with_description("Fashion jacket");
//!
//! let result = client.authorization(&card, SingleAmount(15235), &customer, Params::new()).await?;
//! if result.is_success() {
//!     client.capture(result.transaction_id(), "order_42", "Jacket shipped", Params::new()).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod request;
mod result;

use std::sync::Arc;

use tracing::{info, instrument};

pub use request::{Card, Customer, Destination, ExportPeriod};
pub use result::OperationResult;

use crate::{
    amount::{Amount, SingleAmount},
    constants::{API_VERSION, Compression, operation, param},
    environment::Credentials,
    error::{Be2billError, Result},
    hash::{self, Hasher, Sha256Hasher},
    params::{Params, to_form_body},
    transport::{HttpTransport, ServerErrorPolicy, Transport, post_with_failover},
};

/// Path of payment, authorization, credit, capture, refund and schedule
/// operations.
pub const PROCESS_PATH: &str = "/front/service/rest/process";

/// Path of transaction lookups and transaction/chargeback exports.
pub const EXPORT_PATH: &str = "/front/service/rest/export";

/// Path of reconciliation exports.
pub const RECONCILIATION_PATH: &str = "/front/service/rest/reconciliation";

const ALIAS_MODE_ONE_CLICK: &str = "oneclick";
const ALIAS_MODE_SUBSCRIPTION: &str = "subscription";

/// Client for the DirectLink API.
///
/// Cheap to clone when the transport is; clones share the hasher.
#[derive(Debug, Clone)]
pub struct DirectLinkClient<T = HttpTransport> {
    credentials: Credentials,
    transport: T,
    hasher: Arc<dyn Hasher>,
    server_error_policy: ServerErrorPolicy,
}

impl DirectLinkClient<HttpTransport> {
    /// Creates a client using a default [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::TransportError`](crate::Be2billError::TransportError)
    /// if the HTTP client cannot be created.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Ok(Self::with_transport(credentials, HttpTransport::new()?))
    }

    /// Creates a client for the sandbox environment.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::new`].
    pub fn sandbox(identifier: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::new(Credentials::sandbox(identifier, password))
    }

    /// Creates a client for the production environment.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::new`].
    pub fn production(identifier: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::new(Credentials::production(identifier, password))
    }
}

impl<T: Transport> DirectLinkClient<T> {
    /// Creates a client sending requests through `transport`.
    #[must_use]
    pub fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            credentials,
            transport,
            hasher: Arc::new(Sha256Hasher),
            server_error_policy: ServerErrorPolicy::default(),
        }
    }

    /// Replaces the request hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: impl Hasher + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Sets the behavior on non-2xx host answers.
    #[must_use]
    pub fn with_server_error_policy(mut self, policy: ServerErrorPolicy) -> Self {
        self.server_error_policy = policy;
        self
    }

    /// Credentials used to sign requests.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Debits a card.
    ///
    /// A [`FragmentedAmount`](crate::amount::FragmentedAmount) sets up an
    /// N-time payment sent as `AMOUNTS`.
    ///
    /// # Errors
    ///
    /// Returns a network error once every host failed, or
    /// [`Be2billError::MalformedResponse`](crate::Be2billError::MalformedResponse)
    /// if the answer is not a JSON object.
    pub async fn payment(
        &self,
        card: &Card,
        amount: impl Into<Amount>,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        amount.into().apply_to(&mut params);
        params.insert(param::OPERATION_TYPE, operation::PAYMENT);
        card.apply_to(&mut params);
        self.transaction(params, customer).await
    }

    /// Reserves an amount on a card, to be captured later.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn authorization(
        &self,
        card: &Card,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation::AUTHORIZATION);
        card.apply_to(&mut params);
        params.insert(param::AMOUNT, amount);
        self.transaction(params, customer).await
    }

    /// Credits a card.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn credit(
        &self,
        card: &Card,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation::CREDIT);
        card.apply_to(&mut params);
        params.insert(param::AMOUNT, amount);
        self.transaction(params, customer).await
    }

    /// Debits the card stored under a one-click alias.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn one_click_payment(
        &self,
        alias: &str,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        self.alias_transaction(operation::PAYMENT, ALIAS_MODE_ONE_CLICK, alias, amount, customer, options)
            .await
    }

    /// Reserves an amount on the card stored under a one-click alias.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn one_click_authorization(
        &self,
        alias: &str,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        self.alias_transaction(
            operation::AUTHORIZATION,
            ALIAS_MODE_ONE_CLICK,
            alias,
            amount,
            customer,
            options,
        )
        .await
    }

    /// Debits the card stored under a subscription alias.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn subscription_payment(
        &self,
        alias: &str,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        self.alias_transaction(
            operation::PAYMENT,
            ALIAS_MODE_SUBSCRIPTION,
            alias,
            amount,
            customer,
            options,
        )
        .await
    }

    /// Reserves an amount on the card stored under a subscription alias.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn subscription_authorization(
        &self,
        alias: &str,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        self.alias_transaction(
            operation::AUTHORIZATION,
            ALIAS_MODE_SUBSCRIPTION,
            alias,
            amount,
            customer,
            options,
        )
        .await
    }

    /// Starts a payment completed on a third-party page.
    ///
    /// The result usually carries execution code `0002` and the page to show
    /// in [`OperationResult::redirect_html`].
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn redirect_for_payment(
        &self,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation::PAYMENT);
        params.insert(param::AMOUNT, amount);
        self.transaction(params, customer).await
    }

    /// Refunds a transaction.
    ///
    /// A partial refund is requested by passing `AMOUNT` in `options`.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn refund(
        &self,
        transaction_id: &str,
        order_id: &str,
        description: &str,
        options: Params,
    ) -> Result<OperationResult> {
        self.transaction_operation(operation::REFUND, transaction_id, order_id, description, options)
            .await
    }

    /// Captures an authorization.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn capture(
        &self,
        transaction_id: &str,
        order_id: &str,
        description: &str,
        options: Params,
    ) -> Result<OperationResult> {
        self.transaction_operation(operation::CAPTURE, transaction_id, order_id, description, options)
            .await
    }

    /// Stops the remaining charges of an N-time payment.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn stop_n_times(&self, schedule_id: &str, options: Params) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation::STOP_N_TIMES);
        params.insert(param::SCHEDULE_ID, schedule_id);
        self.send(PROCESS_PATH, params).await
    }

    /// Requests the details of transactions, delivered to `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::InvalidInput`] if the list is empty or holds
    /// an empty identifier; otherwise see [`DirectLinkClient::payment`].
    pub async fn get_transactions_by_transaction_id<I, S>(
        &self,
        transaction_ids: I,
        destination: &Destination,
        compression: Compression,
    ) -> Result<OperationResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_transactions(param::TRANSACTION_ID, &join_ids(transaction_ids), destination, compression)
            .await
    }

    /// Requests the details of the transactions of orders, delivered to
    /// `destination`.
    ///
    /// # Errors
    ///
    /// Same as [`DirectLinkClient::get_transactions_by_transaction_id`].
    pub async fn get_transactions_by_order_id<I, S>(
        &self,
        order_ids: I,
        destination: &Destination,
        compression: Compression,
    ) -> Result<OperationResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.get_transactions(param::ORDER_ID, &join_ids(order_ids), destination, compression).await
    }

    /// Exports the transactions of a period.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn export_transactions(
        &self,
        period: &ExportPeriod,
        destination: &Destination,
        compression: Compression,
        options: Params,
    ) -> Result<OperationResult> {
        self.export(
            EXPORT_PATH,
            operation::EXPORT_TRANSACTIONS,
            period,
            destination,
            compression,
            options,
        )
        .await
    }

    /// Exports the chargebacks of a period.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn export_chargebacks(
        &self,
        period: &ExportPeriod,
        destination: &Destination,
        compression: Compression,
        options: Params,
    ) -> Result<OperationResult> {
        self.export(
            EXPORT_PATH,
            operation::EXPORT_CHARGEBACKS,
            period,
            destination,
            compression,
            options,
        )
        .await
    }

    /// Exports the reconciliation report of a period.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn export_reconciliation(
        &self,
        period: &ExportPeriod,
        destination: &Destination,
        compression: Compression,
        options: Params,
    ) -> Result<OperationResult> {
        self.export(
            RECONCILIATION_PATH,
            operation::EXPORT_RECONCILIATION,
            period,
            destination,
            compression,
            options,
        )
        .await
    }

    /// Exports the transactions reconciled on a single day.
    ///
    /// # Errors
    ///
    /// See [`DirectLinkClient::payment`].
    pub async fn export_reconciled_transactions(
        &self,
        date: &str,
        destination: &Destination,
        compression: Compression,
        options: Params,
    ) -> Result<OperationResult> {
        self.export(
            RECONCILIATION_PATH,
            operation::EXPORT_RECONCILED_TRANSACTIONS,
            &ExportPeriod::Date(date.to_owned()),
            destination,
            compression,
            options,
        )
        .await
    }

    async fn alias_transaction(
        &self,
        operation_type: &str,
        alias_mode: &str,
        alias: &str,
        amount: SingleAmount,
        customer: &Customer,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation_type);
        params.insert(param::ALIAS, alias);
        params.insert(param::ALIAS_MODE, alias_mode);
        params.insert(param::AMOUNT, amount);
        self.transaction(params, customer).await
    }

    async fn transaction_operation(
        &self,
        operation_type: &str,
        transaction_id: &str,
        order_id: &str,
        description: &str,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation_type);
        params.insert(param::TRANSACTION_ID, transaction_id);
        params.insert(param::ORDER_ID, order_id);
        params.insert(param::DESCRIPTION, description);
        self.send(PROCESS_PATH, params).await
    }

    async fn get_transactions(
        &self,
        search_by: &str,
        ids: &str,
        destination: &Destination,
        compression: Compression,
    ) -> Result<OperationResult> {
        if ids.split(';').any(str::is_empty) {
            return Err(Be2billError::InvalidInput(format!(
                "getTransactions needs non-empty {search_by} values, got {ids:?}"
            )));
        }

        let mut params = Params::new();
        params.insert(param::OPERATION_TYPE, operation::GET_TRANSACTIONS);
        params.insert(search_by, ids);
        params.insert(param::COMPRESSION, compression.as_str());
        destination.apply_to(&mut params);
        self.send(EXPORT_PATH, params).await
    }

    async fn export(
        &self,
        path: &str,
        operation_type: &str,
        period: &ExportPeriod,
        destination: &Destination,
        compression: Compression,
        options: Params,
    ) -> Result<OperationResult> {
        let mut params = options;
        params.insert(param::OPERATION_TYPE, operation_type);
        params.insert(param::COMPRESSION, compression.as_str());
        period.apply_to(&mut params);
        destination.apply_to(&mut params);
        self.send(path, params).await
    }

    async fn transaction(&self, mut params: Params, customer: &Customer) -> Result<OperationResult> {
        customer.apply_to(&mut params);
        self.send(PROCESS_PATH, params).await
    }

    #[instrument(
        skip(self, params),
        fields(
            operation = params.get_text(param::OPERATION_TYPE).unwrap_or_default(),
            identifier = self.credentials.identifier(),
        )
    )]
    async fn send(&self, path: &str, mut params: Params) -> Result<OperationResult> {
        params.insert(param::IDENTIFIER, self.credentials.identifier());
        params.insert(param::VERSION, API_VERSION);
        hash::sign(self.hasher.as_ref(), self.credentials.password(), &mut params);

        let body = to_form_body(&params);
        let urls = self.credentials.environment().endpoint_urls(path);
        let response =
            post_with_failover(&self.transport, &urls, &body, self.server_error_policy).await?;

        let result = OperationResult::from_slice(&response)?;
        info!(
            exec_code = result.exec_code(),
            transaction_id = result.transaction_id(),
            "operation completed"
        );
        Ok(result)
    }
}

fn join_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter().map(|id| id.as_ref().to_owned()).collect::<Vec<_>>().join(";")
}
