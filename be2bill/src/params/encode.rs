//! Wire encoding of DirectLink requests.

use url::form_urlencoded;

use std::collections::BTreeMap;

use super::{Params, flatten_into};
use crate::constants::param;

/// Content type of DirectLink request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Encodes a signed parameter map as a DirectLink request body.
///
/// The body carries `method={OPERATIONTYPE}` followed by every flattened
/// parameter wrapped under `params`, so `AMOUNTS[2015-09-12]` is sent as
/// `params[AMOUNTS][2015-09-12]`. A missing `OPERATIONTYPE` yields an empty
/// method.
///
/// # Examples
///
/// ```
/// use be2bill::params::{Params, to_form_body};
///
/// let params = Params::new().with("OPERATIONTYPE", "capture").with("ORDERID", "42");
/// assert_eq!(
///     to_form_body(&params),
///     "method=capture&params%5BOPERATIONTYPE%5D=capture&params%5BORDERID%5D=42"
/// );
/// ```
#[must_use]
pub fn to_form_body(params: &Params) -> String {
    let method = params.get(param::OPERATION_TYPE).and_then(|value| value.as_scalar());

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("method", method.as_deref().unwrap_or_default());
    let mut wrapped = BTreeMap::new();
    for (key, value) in params.iter() {
        flatten_into(format!("params[{key}]"), value, &mut wrapped);
    }
    for (key, value) in &wrapped {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}
