//! Request signing.
//!
//! Before a request leaves the client, its parameters are hashed with the
//! merchant password as a salt and the digest is stored under the reserved
//! `HASH` parameter. be2bill recomputes the digest and rejects any request
//! whose parameters were altered after signing. The same scheme signs the
//! notifications be2bill sends back to the merchant, which [`verify`] checks.
//!
//! # Examples
//!
//! ```
//! use be2bill::{
//!     hash::{self, Sha256Hasher},
//!     params::Params,
//! };
//!
//! let mut params = Params::new().with("c", 3).with("a", "1").with("b", "2");
//! hash::sign(&Sha256Hasher, "password", &mut params);
//!
//! assert_eq!(
//!     params.get_text("HASH"),
//!     Some("77c71c1e70ea28525cf078537d22d1932922e3741ed83287b0dc0a117bf77999")
//! );
//! assert!(hash::verify("password", &params).is_ok());
//! ```

mod sha256;

use std::fmt;

use subtle::ConstantTimeEq;

pub use sha256::Sha256Hasher;

use crate::{
    constants::param,
    error::{Be2billError, Result},
    params::Params,
};

/// Computes the signature of a parameter map.
///
/// Implementations must ignore the top-level `HASH` parameter so that a
/// signed map hashes to the same value as its unsigned form.
pub trait Hasher: fmt::Debug + Send + Sync {
    /// Returns the signature of `params` salted with `password`.
    fn compute_hash(&self, password: &str, params: &Params) -> String;
}

/// Computes the default SHA-256 signature of `params`.
#[must_use]
pub fn compute_hash(password: &str, params: &Params) -> String {
    Sha256Hasher.compute_hash(password, params)
}

/// Signs `params` in place, replacing any existing `HASH` parameter.
pub fn sign(hasher: &dyn Hasher, password: &str, params: &mut Params) {
    let hash = hasher.compute_hash(password, params);
    params.insert(param::HASH, hash);
}

/// Checks the `HASH` parameter of `params` against a freshly computed one.
///
/// A missing or non-text `HASH` is compared as the empty string. The
/// comparison runs in constant time.
#[must_use]
pub fn check_hash(hasher: &dyn Hasher, password: &str, params: &Params) -> bool {
    let received = params.get_text(param::HASH).unwrap_or_default();
    let computed = hasher.compute_hash(password, params);
    bool::from(received.as_bytes().ct_eq(computed.as_bytes()))
}

/// Verifies a signed parameter set with the default hasher.
///
/// Intended for notification handlers receiving be2bill callbacks.
///
/// # Errors
///
/// Returns [`Be2billError::InvalidSignature`] if the `HASH` parameter does not
/// match the parameters.
pub fn verify(password: &str, params: &Params) -> Result<()> {
    if check_hash(&Sha256Hasher, password, params) {
        Ok(())
    } else {
        Err(Be2billError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests;
