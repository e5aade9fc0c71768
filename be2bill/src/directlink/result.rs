//! Results of DirectLink operations.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{ExecCodeClass, exec_code, result_param},
    error::{Be2billError, Result},
};

/// Decoded answer of a DirectLink operation.
///
/// A JSON object whose keys are the notification parameters documented by
/// be2bill. The typed accessors cover the common ones; [`get`](Self::get)
/// reaches everything else.
///
/// # Examples
///
/// ```
/// use be2bill::directlink::OperationResult;
///
/// let result = OperationResult::from_slice(
///     br#"{"OPERATIONTYPE":"capture","TRANSACTIONID":"A1","EXECCODE":"0000","MESSAGE":"ok"}"#,
/// )?;
/// assert!(result.is_success());
/// assert_eq!(result.transaction_id(), "A1");
/// assert_eq!(result.string_value("DESCRIPTOR"), "");
/// # Ok::<(), be2bill::Be2billError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationResult(Map<String, Value>);

impl OperationResult {
    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::MalformedResponse`] if the body is not a JSON
    /// object.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Raw value of a result field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Text value of a result field, or `""` if it is missing or not a string.
    #[must_use]
    pub fn string_value(&self, name: &str) -> &str {
        self.0.get(name).and_then(Value::as_str).unwrap_or_default()
    }

    /// Operation that produced this result.
    #[must_use]
    pub fn operation_type(&self) -> &str {
        self.string_value(result_param::OPERATION_TYPE)
    }

    /// Identifier of the transaction created or affected by the operation.
    #[must_use]
    pub fn transaction_id(&self) -> &str {
        self.string_value(result_param::TRANSACTION_ID)
    }

    /// Execution code, see [`exec_code`].
    #[must_use]
    pub fn exec_code(&self) -> &str {
        self.string_value(result_param::EXEC_CODE)
    }

    /// Human-readable message for the execution code.
    #[must_use]
    pub fn message(&self) -> &str {
        self.string_value(result_param::MESSAGE)
    }

    /// Descriptor shown on the customer's bank statement.
    #[must_use]
    pub fn descriptor(&self) -> &str {
        self.string_value(result_param::DESCRIPTOR)
    }

    /// Amount in cents, sent by be2bill either as a number or as a string.
    #[must_use]
    pub fn amount(&self) -> Option<i64> {
        match self.0.get(result_param::AMOUNT)? {
            Value::Number(number) => number.as_i64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// Decoded `REDIRECTHTML` page, present when the customer must be
    /// redirected (execution codes `0001` and `0002`).
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::MalformedRedirectHtml`] if the field is not
    /// base64-encoded UTF-8.
    pub fn redirect_html(&self) -> Result<Option<String>> {
        let encoded = self.string_value(result_param::REDIRECT_HTML);
        if encoded.is_empty() {
            return Ok(None);
        }

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| Be2billError::MalformedRedirectHtml(e.to_string()))?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| Be2billError::MalformedRedirectHtml(e.to_string()))
    }

    /// Returns `true` if the execution code is exactly `0000`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.exec_code() == exec_code::SUCCESS
    }

    /// Family of the execution code.
    #[must_use]
    pub fn exec_code_class(&self) -> ExecCodeClass {
        ExecCodeClass::of(self.exec_code())
    }

    /// Consumes the result, returning the underlying JSON object.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
