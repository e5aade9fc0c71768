//! SHA-256 hasher used by the be2bill API.

use sha2::{Digest, Sha256};
use tracing::instrument;

use super::Hasher;
use crate::{
    constants::param,
    params::{Params, Value},
};

/// The be2bill SHA-256 parameter hasher.
///
/// The hashed string starts with the password, then lists every parameter in
/// ascending key order as `KEY=value` immediately followed by the password.
/// Nested maps contribute one `KEY[sub]=value` entry per leaf, also in
/// ascending order. The digest is rendered as 64 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use be2bill::{
///     hash::{Hasher, Sha256Hasher},
///     params::Params,
/// };
///
/// let params = Params::new()
///     .with("c", 3)
///     .with("a", "1")
///     .with("b", "2")
///     .with("d", Params::new().with("y", 43).with("x", 42));
///
/// assert_eq!(
///     Sha256Hasher.compute_hash("password", &params),
///     "376383093261372eb97909ed1a44b1adb5e8f2687f7a64f1c41d5a0c8cc0b0fa"
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    #[instrument(level = "trace", skip_all, fields(param_count = params.len()))]
    fn compute_hash(&self, password: &str, params: &Params) -> String {
        let mut digest = Sha256::new();
        digest.update(password.as_bytes());

        for (key, value) in params.iter().filter(|(key, _)| key.as_str() != param::HASH) {
            append_entry(&mut digest, key, value, password);
        }

        hex::encode(digest.finalize())
    }
}

fn append_entry(digest: &mut Sha256, name: &str, value: &Value, password: &str) {
    if let Value::Nested(nested) = value {
        for (key, inner) in nested {
            append_entry(digest, &format!("{name}[{key}]"), inner, password);
        }
    } else if let Some(scalar) = value.as_scalar() {
        digest.update(name.as_bytes());
        digest.update(b"=");
        digest.update(scalar.as_bytes());
        digest.update(password.as_bytes());
    }
}
