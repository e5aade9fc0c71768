//! Inputs of DirectLink operations.

use std::fmt;

use url::Url;
use zeroize::Zeroize;

use crate::{constants::param, params::Params};

/// Card details for payment, authorization and credit operations.
///
/// The card number and cryptogram are wiped from memory on drop and masked
/// in `Debug` output.
///
/// # Examples
///
/// ```
/// use be2bill::directlink::Card;
///
/// let card = Card::new("1111222233334444", "01-12", "123", "John Doe");
/// assert_eq!(card.last_four(), "4444");
/// assert!(!format!("{card:?}").contains("1111222233334444"));
/// ```
#[derive(Clone)]
pub struct Card {
    /// Card number (PAN), sent as `CARDCODE`.
    pub pan: String,
    /// Expiry date as `MM-YY`, sent as `CARDVALIDITYDATE`.
    pub validity_date: String,
    /// Card verification value, sent as `CARDCVV`.
    pub cryptogram: String,
    /// Cardholder name, sent as `CARDFULLNAME`.
    pub full_name: String,
}

impl Card {
    /// Creates card details.
    #[must_use]
    pub fn new(
        pan: impl Into<String>,
        validity_date: impl Into<String>,
        cryptogram: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            pan: pan.into(),
            validity_date: validity_date.into(),
            cryptogram: cryptogram.into(),
            full_name: full_name.into(),
        }
    }

    /// Returns the last four characters of the card number.
    #[must_use]
    pub fn last_four(&self) -> &str {
        let start = self.pan.char_indices().rev().nth(3).map_or(0, |(index, _)| index);
        &self.pan[start..]
    }

    pub(crate) fn apply_to(&self, params: &mut Params) {
        params.insert(param::CARD_CODE, self.pan.as_str());
        params.insert(param::CARD_VALIDITY_DATE, self.validity_date.as_str());
        params.insert(param::CARD_CVV, self.cryptogram.as_str());
        params.insert(param::CARD_FULL_NAME, self.full_name.as_str());
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("pan", &format_args!("****{}", self.last_four()))
            .field("validity_date", &self.validity_date)
            .field("cryptogram", &"[REDACTED]")
            .field("full_name", &self.full_name)
            .finish()
    }
}

impl Drop for Card {
    fn drop(&mut self) {
        self.pan.zeroize();
        self.cryptogram.zeroize();
    }
}

/// Customer and order details attached to every transaction.
///
/// All six fields are always sent, empty ones included.
///
/// # Examples
///
/// ```
/// use be2bill::directlink::Customer;
///
/// let customer = Customer::new("order_1412327697", "6328_john.smith")
///     .with_email("john.smith@example.org")
///     .with_ip("123.123.123.123")
///     .with_description("Fashion jacket")
///     .with_user_agent("Firefox");
/// assert_eq!(customer.order_id, "order_1412327697");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    /// Merchant order identifier, sent as `ORDERID`.
    pub order_id: String,
    /// Merchant customer identifier, sent as `CLIENTIDENT`.
    pub client_id: String,
    /// Sent as `CLIENTEMAIL`.
    pub client_email: String,
    /// Sent as `CLIENTIP`.
    pub client_ip: String,
    /// Sent as `DESCRIPTION`.
    pub description: String,
    /// Sent as `CLIENTUSERAGENT`.
    pub user_agent: String,
}

impl Customer {
    /// Creates customer details for an order.
    #[must_use]
    pub fn new(order_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self { order_id: order_id.into(), client_id: client_id.into(), ..Self::default() }
    }

    /// Sets the customer email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.client_email = email.into();
        self
    }

    /// Sets the customer IP address.
    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.client_ip = ip.into();
        self
    }

    /// Sets the order description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the customer browser user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub(crate) fn apply_to(&self, params: &mut Params) {
        params.insert(param::ORDER_ID, self.order_id.as_str());
        params.insert(param::CLIENT_IDENT, self.client_id.as_str());
        params.insert(param::CLIENT_EMAIL, self.client_email.as_str());
        params.insert(param::CLIENT_IP, self.client_ip.as_str());
        params.insert(param::DESCRIPTION, self.description.as_str());
        params.insert(param::CLIENT_USER_AGENT, self.user_agent.as_str());
    }
}

/// Time range covered by an export.
///
/// Dates are sent as given; be2bill accepts `YYYY-MM-DD` days and `YYYY-MM`
/// months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPeriod {
    /// A single day or month, sent as `DATE`.
    Date(String),
    /// An inclusive range, sent as `STARTDATE` and `ENDDATE`.
    Interval {
        /// First day of the range.
        start: String,
        /// Last day of the range.
        end: String,
    },
}

impl ExportPeriod {
    /// Builds a period from a start date and an optional end date.
    ///
    /// An empty end date yields [`ExportPeriod::Date`].
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::directlink::ExportPeriod;
    ///
    /// assert_eq!(ExportPeriod::new("2015-01", ""), ExportPeriod::Date("2015-01".to_owned()));
    /// assert!(matches!(ExportPeriod::new("2015-01-01", "2015-01-31"), ExportPeriod::Interval { .. }));
    /// ```
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        let (start, end) = (start.into(), end.into());
        if end.is_empty() { Self::Date(start) } else { Self::Interval { start, end } }
    }

    pub(crate) fn apply_to(&self, params: &mut Params) {
        match self {
            Self::Date(date) => {
                params.insert(param::DATE, date.as_str());
            }
            Self::Interval { start, end } => {
                params.insert(param::START_DATE, start.as_str());
                params.insert(param::END_DATE, end.as_str());
            }
        }
    }
}

/// Where be2bill delivers export files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Posted to a merchant URL, sent as `CALLBACKURL`.
    CallbackUrl(String),
    /// Mailed to an address, sent as `MAILTO`.
    MailTo(String),
}

impl Destination {
    /// Picks the destination kind from a raw string.
    ///
    /// `http` and `https` URLs become callbacks, anything else an email
    /// address.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::directlink::Destination;
    ///
    /// assert!(matches!(Destination::parse("https://merchant.example/exports"), Destination::CallbackUrl(_)));
    /// assert!(matches!(Destination::parse("exports@merchant.example"), Destination::MailTo(_)));
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Self::CallbackUrl(raw.to_owned()),
            _ => Self::MailTo(raw.to_owned()),
        }
    }

    pub(crate) fn apply_to(&self, params: &mut Params) {
        match self {
            Self::CallbackUrl(url) => {
                params.insert(param::CALLBACK_URL, url.as_str());
            }
            Self::MailTo(address) => {
                params.insert(param::MAIL_TO, address.as_str());
            }
        }
    }
}
