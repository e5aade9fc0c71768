//! be2bill environments and merchant credentials.
//!
//! An [`Environment`] is the ordered list of hosts a client talks to. The
//! first host is used for forms and tried first by DirectLink; the others
//! are failover targets. Environments are immutable: [`Environment::switched`]
//! returns a new value instead of reordering a shared list.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Production hosts, in failover order.
pub const PRODUCTION_URLS: [&str; 2] =
    ["https://secure-magenta1.be2bill.com", "https://secure-magenta2.be2bill.com"];

/// Sandbox host.
pub const SANDBOX_URLS: [&str; 1] = ["https://secure-test.be2bill.com"];

/// Ordered list of be2bill base URLs.
///
/// # Examples
///
/// ```
/// use be2bill::Environment;
///
/// let production = Environment::production();
/// assert_eq!(production.primary(), Some("https://secure-magenta1.be2bill.com"));
///
/// let switched = production.switched();
/// assert_eq!(switched.primary(), Some("https://secure-magenta2.be2bill.com"));
/// assert_eq!(production.primary(), Some("https://secure-magenta1.be2bill.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    urls: Vec<String>,
}

impl Environment {
    /// Creates an environment from base URLs, in failover order.
    #[must_use]
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { urls: urls.into_iter().map(Into::into).collect() }
    }

    /// The two production hosts.
    #[must_use]
    pub fn production() -> Self {
        Self::new(PRODUCTION_URLS)
    }

    /// The sandbox host.
    #[must_use]
    pub fn sandbox() -> Self {
        Self::new(SANDBOX_URLS)
    }

    /// Base URLs in failover order.
    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// First base URL, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    /// Returns `true` if the environment holds no host.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Returns a copy of this environment with the host order reversed.
    ///
    /// Used to move traffic to the secondary production host.
    #[must_use]
    pub fn switched(&self) -> Self {
        Self { urls: self.urls.iter().rev().cloned().collect() }
    }

    /// Full URLs of `path` on every host, in failover order.
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::Environment;
    ///
    /// let env = Environment::new(["https://a.example/", "https://b.example"]);
    /// assert_eq!(
    ///     env.endpoint_urls("/front/service/rest/process"),
    ///     vec![
    ///         "https://a.example/front/service/rest/process",
    ///         "https://b.example/front/service/rest/process",
    ///     ]
    /// );
    /// ```
    #[must_use]
    pub fn endpoint_urls(&self, path: &str) -> Vec<String> {
        self.urls.iter().map(|base| join_path(base, path)).collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::production()
    }
}

pub(crate) fn join_path(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Merchant account credentials bound to an environment.
///
/// The password is wiped from memory when the credentials are dropped and
/// never appears in `Debug` output.
///
/// # Examples
///
/// ```
/// use be2bill::Credentials;
///
/// let credentials = Credentials::sandbox("MERCHANT", "secret");
/// assert_eq!(credentials.identifier(), "MERCHANT");
/// assert!(!format!("{credentials:?}").contains("secret"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: Zeroizing<String>,
    environment: Environment,
}

impl Credentials {
    /// Creates credentials for an explicit environment.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        password: impl Into<String>,
        environment: Environment,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            password: Zeroizing::new(password.into()),
            environment,
        }
    }

    /// Creates credentials for the production environment.
    #[must_use]
    pub fn production(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(identifier, password, Environment::production())
    }

    /// Creates credentials for the sandbox environment.
    #[must_use]
    pub fn sandbox(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(identifier, password, Environment::sandbox())
    }

    /// Returns the same account bound to another environment.
    #[must_use]
    pub fn with_environment(&self, environment: Environment) -> Self {
        Self {
            identifier: self.identifier.clone(),
            password: self.password.clone(),
            environment,
        }
    }

    /// Merchant identifier, sent as `IDENTIFIER`.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Hosts this account talks to.
    #[must_use]
    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .field("environment", &self.environment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_hosts() {
        let env = Environment::production();
        assert_eq!(env.urls(), &[
            "https://secure-magenta1.be2bill.com".to_owned(),
            "https://secure-magenta2.be2bill.com".to_owned(),
        ]);
    }

    #[test]
    fn test_sandbox_host() {
        assert_eq!(Environment::sandbox().primary(), Some("https://secure-test.be2bill.com"));
    }

    #[test]
    fn test_switched_is_a_new_value() {
        let env = Environment::new(["https://a", "https://b", "https://c"]);
        let switched = env.switched();
        assert_eq!(switched.urls(), &["https://c".to_owned(), "https://b".to_owned(), "https://a".to_owned()]);
        assert_eq!(env.primary(), Some("https://a"));
        assert_eq!(switched.switched(), env);
    }

    #[test]
    fn test_empty_environment() {
        let env = Environment::new(Vec::<String>::new());
        assert!(env.is_empty());
        assert_eq!(env.primary(), None);
        assert!(env.endpoint_urls("/x").is_empty());
        assert!(env.switched().is_empty());
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("https://a/", "/p"), "https://a/p");
        assert_eq!(join_path("https://a", "p"), "https://a/p");
    }

    #[test]
    fn test_environment_deserializes_from_list() {
        let env: Environment = serde_json::from_str(r#"["https://a", "https://b"]"#).unwrap();
        assert_eq!(env.primary(), Some("https://a"));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::production("ID", "hunter2");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("ID"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn test_with_environment_keeps_account() {
        let sandbox = Credentials::sandbox("ID", "pw");
        let production = sandbox.with_environment(Environment::production());
        assert_eq!(production.identifier(), "ID");
        assert_eq!(production.password(), "pw");
        assert_eq!(production.environment(), &Environment::production());
        assert_eq!(sandbox.environment(), &Environment::sandbox());
    }
}
