//! Field names, operation types and execution codes defined by the be2bill API.
//!
//! See <https://developer.be2bill.com/annexes/parameters> and
//! <https://developer.be2bill.com/annexes/execcodes>.

use std::fmt;

use serde::Deserialize;

/// Version of the API implemented by this crate, sent as `VERSION`.
pub const API_VERSION: &str = "2.0";

/// Request parameter names.
pub mod param {
    #![allow(missing_docs)]

    pub const THREE_D_SECURE: &str = "3DSECURE";
    pub const THREE_D_SECURE_DISPLAY_MODE: &str = "3DSECUREDISPLAYMODE";
    pub const ALIAS: &str = "ALIAS";
    pub const ALIAS_MODE: &str = "ALIASMODE";
    pub const AMOUNT: &str = "AMOUNT";
    pub const AMOUNTS: &str = "AMOUNTS";
    pub const BILLING_ADDRESS: &str = "BILLINGADDRESS";
    pub const BILLING_COUNTRY: &str = "BILLINGCOUNTRY";
    pub const BILLING_FIRST_NAME: &str = "BILLINGFIRSTNAME";
    pub const BILLING_LAST_NAME: &str = "BILLINGLASTNAME";
    pub const BILLING_PHONE: &str = "BILLINGPHONE";
    pub const BILLING_POSTAL_CODE: &str = "BILLINGPOSTALCODE";
    pub const CALLBACK_URL: &str = "CALLBACKURL";
    pub const CARD_CODE: &str = "CARDCODE";
    pub const CARD_CVV: &str = "CARDCVV";
    pub const CARD_FULL_NAME: &str = "CARDFULLNAME";
    pub const CARD_VALIDITY_DATE: &str = "CARDVALIDITYDATE";
    pub const CLIENT_ADDRESS: &str = "CLIENTADDRESS";
    pub const CLIENT_DOB: &str = "CLIENTDOB";
    pub const CLIENT_EMAIL: &str = "CLIENTEMAIL";
    pub const CLIENT_IDENT: &str = "CLIENTIDENT";
    pub const CLIENT_IP: &str = "CLIENTIP";
    pub const CLIENT_REFERRER: &str = "CLIENTREFERRER";
    pub const CLIENT_USER_AGENT: &str = "CLIENTUSERAGENT";
    pub const COMPRESSION: &str = "COMPRESSION";
    pub const CREATE_ALIAS: &str = "CREATEALIAS";
    pub const DATE: &str = "DATE";
    pub const DAY: &str = "DAY";
    pub const DESCRIPTION: &str = "DESCRIPTION";
    pub const DISPLAY_CREATE_ALIAS: &str = "DISPLAYCREATEALIAS";
    pub const END_DATE: &str = "ENDDATE";
    pub const EXTRA_DATA: &str = "EXTRADATA";
    /// Reserved signature field, never part of the hashed string.
    pub const HASH: &str = "HASH";
    pub const HIDE_CARD_FULL_NAME: &str = "HIDECARDFULLNAME";
    pub const HIDE_CLIENT_EMAIL: &str = "HIDECLIENTEMAIL";
    pub const IDENTIFIER: &str = "IDENTIFIER";
    pub const LANGUAGE: &str = "LANGUAGE";
    pub const MAIL_TO: &str = "MAILTO";
    pub const METADATA: &str = "METADATA";
    pub const OPERATION_TYPE: &str = "OPERATIONTYPE";
    pub const ORDER_ID: &str = "ORDERID";
    pub const SCHEDULE_ID: &str = "SCHEDULEID";
    pub const SHIP_TO_ADDRESS: &str = "SHIPTOADDRESS";
    pub const SHIP_TO_COUNTRY: &str = "SHIPTOCOUNTRY";
    pub const SHIP_TO_FIRST_NAME: &str = "SHIPTOFIRSTNAME";
    pub const SHIP_TO_LAST_NAME: &str = "SHIPTOLASTNAME";
    pub const SHIP_TO_PHONE: &str = "SHIPTOPHONE";
    pub const SHIP_TO_POSTAL_CODE: &str = "SHIPTOPOSTALCODE";
    pub const START_DATE: &str = "STARTDATE";
    pub const TIME_ZONE: &str = "TIMEZONE";
    pub const TRANSACTION_ID: &str = "TRANSACTIONID";
    pub const VERSION: &str = "VERSION";
    pub const VME: &str = "VME";
}

/// Operation types, sent as `OPERATIONTYPE` and as the DirectLink `method`.
pub mod operation {
    #![allow(missing_docs)]

    pub const AUTHORIZATION: &str = "authorization";
    pub const CAPTURE: &str = "capture";
    pub const CREDIT: &str = "credit";
    pub const PAYMENT: &str = "payment";
    pub const REFUND: &str = "refund";
    pub const STOP_N_TIMES: &str = "stopntimes";
    pub const GET_TRANSACTIONS: &str = "getTransactions";
    pub const EXPORT_TRANSACTIONS: &str = "exportTransactions";
    pub const EXPORT_CHARGEBACKS: &str = "exportChargebacks";
    pub const EXPORT_RECONCILIATION: &str = "exportReconciliation";
    pub const EXPORT_RECONCILED_TRANSACTIONS: &str = "exportReconciledTransactions";
}

/// Keys of DirectLink result objects.
pub mod result_param {
    #![allow(missing_docs)]

    pub const OPERATION_TYPE: &str = "OPERATIONTYPE";
    pub const TRANSACTION_ID: &str = "TRANSACTIONID";
    pub const EXEC_CODE: &str = "EXECCODE";
    pub const MESSAGE: &str = "MESSAGE";
    pub const DESCRIPTOR: &str = "DESCRIPTOR";
    pub const AMOUNT: &str = "AMOUNT";
    pub const REDIRECT_HTML: &str = "REDIRECTHTML";
}

/// Keys of the HTML options accepted by the form renderer.
pub mod html_option {
    /// Attributes of the `<form>` tag.
    pub const FORM: &str = "FORM";
    /// Attributes of the submit `<input>`.
    pub const SUBMIT: &str = "SUBMIT";
}

/// Execution codes returned in `EXECCODE`.
pub mod exec_code {
    #![allow(missing_docs)]

    pub const SUCCESS: &str = "0000";
    pub const THREE_D_SECURE_REQUIRED: &str = "0001";
    pub const ALTERNATE_REDIRECT_REQUIRED: &str = "0002";

    pub const MISSING_PARAMETER: &str = "1001";
    pub const INVALID_PARAMETER: &str = "1002";
    pub const INVALID_HASH: &str = "1003";
    pub const UNSUPPORTED_PROTOCOL: &str = "1004";

    pub const ALIAS_NOT_FOUND: &str = "2001";
    pub const TRANSACTION_NOT_FOUND: &str = "2002";
    pub const UNSUCCESSFUL_TRANSACTION: &str = "2003";
    pub const TRANSACTION_NOT_REFUNDABLE: &str = "2004";
    pub const AUTHORIZATION_NOT_CAPTURABLE: &str = "2005";
    pub const INCOMPLETE_TRANSACTION: &str = "2006";
    pub const INVALID_CAPTURE_AMOUNT: &str = "2007";
    pub const INVALID_REFUND_AMOUNT: &str = "2008";
    pub const AUTHORIZATION_TIMEOUT: &str = "2009";
    pub const SCHEDULE_NOT_FOUND: &str = "2010";
    pub const INTERRUPTED_SCHEDULE: &str = "2011";
    pub const SCHEDULE_FINISHED: &str = "2012";

    pub const ACCOUNT_DEACTIVATED: &str = "3001";
    pub const UNAUTHORIZED_SERVER_IP: &str = "3002";
    pub const UNAUTHORIZED_TRANSACTION: &str = "3003";

    pub const TRANSACTION_REFUSED_BANK: &str = "4001";
    pub const INSUFFICIENT_FUNDS: &str = "4002";
    pub const CARD_REFUSED: &str = "4003";
    pub const TRANSACTION_ABANDONED: &str = "4004";
    pub const SUSPECTED_FRAUD: &str = "4005";
    pub const CARD_LOST: &str = "4006";
    pub const CARD_STOLEN: &str = "4007";
    pub const THREE_D_SECURE_AUTHENTICATION_FAILED: &str = "4008";
    pub const THREE_D_SECURE_AUTHENTICATION_TIMEOUT: &str = "4009";
    pub const INVALID_TRANSACTION: &str = "4010";
    pub const DUPLICATE_TRANSACTION: &str = "4011";
    pub const INVALID_CARD_DATA: &str = "4012";
    pub const TRANSACTION_NOT_AUTHORIZED: &str = "4013";
    pub const CARD_3D_SECURE_NOT_SUPPORTED: &str = "4014";
    pub const TRANSACTION_TIMEOUT: &str = "4015";
    pub const TRANSACTION_REFUSED_BY_TERMINAL: &str = "4016";

    pub const EXCHANGE_PROTOCOL_ERROR: &str = "5001";
    pub const BANK_NETWORK_ERROR: &str = "5002";
    pub const HANDLER_TIMEOUT: &str = "5004";
    pub const THREE_D_SECURE_DISPLAY_ERROR: &str = "5005";

    pub const TRANSACTION_REFUSED_MERCHANT: &str = "6001";
    pub const TRANSACTION_REFUSED_UNKNOWN: &str = "6002";
    pub const TRANSACTION_CHALLENGED: &str = "6003";
    pub const TRANSACTION_REFUSED_MERCHANT_RULES: &str = "6004";
}

/// Family of an execution code, derived from its leading digit.
///
/// Only [`ExecCodeClass::Success`] means the operation succeeded; the other
/// classes help callers route failures without matching every code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecCodeClass {
    /// `0000`.
    Success,
    /// `0xxx` other than `0000`: the customer must complete a step
    /// (3-D Secure challenge, alternate redirect).
    ActionRequired,
    /// `1xxx`: the request itself is invalid.
    RequestError,
    /// `2xxx`: referenced alias, transaction or schedule in the wrong state.
    StateError,
    /// `3xxx`: merchant account restrictions.
    AccountError,
    /// `4xxx`: card or bank refusal.
    BankRefusal,
    /// `5xxx`: gateway or bank network error.
    GatewayError,
    /// `6xxx`: refused by merchant-side rules.
    MerchantRefusal,
    /// Not a known execution code.
    Unknown,
}

impl ExecCodeClass {
    /// Classifies an execution code.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::constants::{ExecCodeClass, exec_code};
    ///
    /// assert_eq!(ExecCodeClass::of(exec_code::SUCCESS), ExecCodeClass::Success);
    /// assert_eq!(ExecCodeClass::of(exec_code::CARD_STOLEN), ExecCodeClass::BankRefusal);
    /// assert_eq!(ExecCodeClass::of(""), ExecCodeClass::Unknown);
    /// ```
    #[must_use]
    pub fn of(code: &str) -> Self {
        if code == exec_code::SUCCESS {
            return Self::Success;
        }
        if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Unknown;
        }
        match code.as_bytes()[0] {
            b'0' => Self::ActionRequired,
            b'1' => Self::RequestError,
            b'2' => Self::StateError,
            b'3' => Self::AccountError,
            b'4' => Self::BankRefusal,
            b'5' => Self::GatewayError,
            b'6' => Self::MerchantRefusal,
            _ => Self::Unknown,
        }
    }
}

/// Compression formats supported by export operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// ZIP archive.
    #[default]
    Zip,
    /// Gzip stream.
    Gzip,
    /// Bzip2 stream.
    Bzip,
}

impl Compression {
    /// Value sent as `COMPRESSION`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::Gzip => "GZIP",
            Self::Bzip => "BZIP",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
