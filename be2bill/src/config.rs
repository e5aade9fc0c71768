//! Client configuration.
//!
//! This module defines the TOML-deserializable configuration of a be2bill
//! account: identifier, where to read the password from, which environment
//! to talk to and how to reach it.
//!
//! ```toml
//! identifier = "MERCHANT"
//! password_env = "BE2BILL_PASSWORD"
//! environment = "sandbox"
//!
//! [transport]
//! timeout_secs = 30
//! server_error_policy = "next_host"
//! ```

use std::{fmt, path::Path};

use serde::Deserialize;
use url::Url;

use crate::{
    directlink::DirectLinkClient,
    environment::{Credentials, Environment},
    error::{Be2billError, Result},
    form::FormClient,
    transport::{HttpTransport, TransportConfig},
};

/// Root client configuration.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Merchant identifier, sent as `IDENTIFIER`.
    pub identifier: String,

    /// Inline password. Mutually exclusive with `password_env`.
    #[serde(default)]
    pub password: Option<String>,

    /// Name of the environment variable holding the password.
    #[serde(default)]
    pub password_env: Option<String>,

    /// Hosts to talk to.
    pub environment: EnvironmentConfig,

    /// HTTP transport settings.
    #[serde(default)]
    pub transport: TransportConfig,
}

/// Environment selection: a well-known name or an explicit host list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentConfig {
    /// `"production"` or `"sandbox"`.
    Named(EnvironmentName),
    /// Base URLs in failover order.
    Urls(Vec<String>),
}

/// Well-known be2bill environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentName {
    /// Live hosts.
    Production,
    /// Test host.
    Sandbox,
}

impl EnvironmentConfig {
    /// Resolves the selection into an [`Environment`].
    #[must_use]
    pub fn to_environment(&self) -> Environment {
        match self {
            Self::Named(EnvironmentName::Production) => Environment::production(),
            Self::Named(EnvironmentName::Sandbox) => Environment::sandbox(),
            Self::Urls(urls) => Environment::new(urls),
        }
    }
}

impl ClientConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] if the document does not parse or
    /// fails [`validate`](Self::validate).
    ///
    /// # Examples
    ///
    /// ```
    /// use be2bill::ClientConfig;
    ///
    /// let config = ClientConfig::from_toml(
    ///     r#"
    ///     identifier = "MERCHANT"
    ///     password = "secret"
    ///     environment = "sandbox"
    ///     "#,
    /// )?;
    ///
    /// assert_eq!(config.identifier, "MERCHANT");
    /// assert_eq!(config.transport.timeout_secs, 30);
    /// # Ok::<(), be2bill::Be2billError>(())
    /// ```
    pub fn from_toml(document: &str) -> Result<Self> {
        let config: Self = toml::from_str(document)
            .map_err(|e| Be2billError::ConfigError(format!("failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] if the file cannot be read or
    /// its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|e| {
            Be2billError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&document)
    }

    /// Validates the configuration.
    ///
    /// This method checks for:
    /// - A non-empty identifier
    /// - Exactly one of `password` and `password_env`
    /// - An alphanumeric environment variable name
    /// - At least one host, every host an HTTPS URL
    /// - Transport bounds
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] if any validation fails.
    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(Be2billError::ConfigError("identifier must not be empty".to_owned()));
        }

        match (&self.password, &self.password_env) {
            (Some(_), Some(_)) => {
                return Err(Be2billError::ConfigError(
                    "password and password_env are mutually exclusive".to_owned(),
                ));
            }
            (None, None) => {
                return Err(Be2billError::ConfigError(
                    "one of password or password_env is required".to_owned(),
                ));
            }
            (None, Some(name)) => validate_env_var_name(name)?,
            (Some(_), None) => {}
        }

        if let EnvironmentConfig::Urls(urls) = &self.environment {
            if urls.is_empty() {
                return Err(Be2billError::ConfigError(
                    "environment must list at least one URL".to_owned(),
                ));
            }
            for url in urls {
                validate_host_url(url)?;
            }
        }

        self.transport.validate()
    }

    /// Builds the account credentials, reading `password_env` if set.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] if the password variable is not
    /// set or not valid unicode.
    pub fn credentials(&self) -> Result<Credentials> {
        let password = match (&self.password, &self.password_env) {
            (Some(password), _) => password.clone(),
            (None, Some(name)) => std::env::var(name).map_err(|e| {
                Be2billError::ConfigError(format!("cannot read password from ${name}: {e}"))
            })?,
            (None, None) => {
                return Err(Be2billError::ConfigError("no password source configured".to_owned()));
            }
        };

        Ok(Credentials::new(&self.identifier, password, self.environment.to_environment()))
    }

    /// Builds a DirectLink client honoring the transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be resolved or the HTTP
    /// client cannot be built.
    pub fn direct_link_client(&self) -> Result<DirectLinkClient> {
        let transport = HttpTransport::with_config(&self.transport)?;
        Ok(DirectLinkClient::with_transport(self.credentials()?, transport)
            .with_server_error_policy(self.transport.server_error_policy))
    }

    /// Builds a form client posting to the primary host.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be resolved.
    pub fn form_client(&self) -> Result<FormClient> {
        FormClient::new(self.credentials()?)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("identifier", &self.identifier)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("password_env", &self.password_env)
            .field("environment", &self.environment)
            .field("transport", &self.transport)
            .finish()
    }
}

fn validate_env_var_name(name: &str) -> Result<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Be2billError::ConfigError(format!(
            "password_env must be alphanumeric with underscores, got: {name:?}"
        )));
    }
    Ok(())
}

fn validate_host_url(raw: &str) -> Result<()> {
    let url = Url::parse(raw)
        .map_err(|e| Be2billError::ConfigError(format!("invalid host URL '{raw}': {e}")))?;

    if url.scheme() != "https" {
        return Err(Be2billError::ConfigError(format!(
            "host URL must use HTTPS, got: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(Be2billError::ConfigError(format!("host URL has no host: {raw}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{HttpVersion, ServerErrorPolicy};

    fn parse(document: &str) -> Result<ClientConfig> {
        ClientConfig::from_toml(document)
    }

    #[test]
    fn test_minimal_config() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "production"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, EnvironmentConfig::Named(EnvironmentName::Production));
        assert_eq!(config.transport, TransportConfig::default());
        assert_eq!(config.environment.to_environment(), Environment::production());
    }

    #[test]
    fn test_complete_config() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password_env = "BE2BILL_PASSWORD"
            environment = ["https://a.example.com", "https://b.example.com"]

            [transport]
            timeout_secs = 12
            http_version = "http1"
            server_error_policy = "abort"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.environment.to_environment().urls(),
            ["https://a.example.com", "https://b.example.com"]
        );
        assert_eq!(config.transport.timeout_secs, 12);
        assert_eq!(config.transport.http_version, HttpVersion::Http1);
        assert_eq!(config.transport.server_error_policy, ServerErrorPolicy::Abort);
    }

    #[test]
    fn test_invalid_toml_syntax() {
        let result = parse("identifier = ");
        assert!(matches!(result, Err(Be2billError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_environment_name() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "staging"
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(_))));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "sandbox"
            secret_key = "x"
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(_))));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let result = parse(
            r#"
            identifier = " "
            password = "secret"
            environment = "sandbox"
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(msg)) if msg.contains("identifier")));
    }

    #[test]
    fn test_password_sources_are_exclusive() {
        let both = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            password_env = "BE2BILL_PASSWORD"
            environment = "sandbox"
            "#,
        );
        assert!(matches!(both, Err(Be2billError::ConfigError(msg)) if msg.contains("exclusive")));

        let none = parse(
            r#"
            identifier = "MERCHANT"
            environment = "sandbox"
            "#,
        );
        assert!(matches!(none, Err(Be2billError::ConfigError(msg)) if msg.contains("required")));
    }

    #[test]
    fn test_invalid_env_var_name() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password_env = "PASS; rm -rf"
            environment = "sandbox"
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(msg)) if msg.contains("password_env")));
    }

    #[test]
    fn test_http_host_rejected() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = ["http://insecure.example.com"]
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(msg)) if msg.contains("HTTPS")));
    }

    #[test]
    fn test_empty_url_list_rejected() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = []
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(_))));
    }

    #[test]
    fn test_transport_bounds_checked() {
        let result = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "sandbox"

            [transport]
            timeout_secs = 0
            "#,
        );
        assert!(matches!(result, Err(Be2billError::ConfigError(_))));
    }

    #[test]
    fn test_credentials_from_inline_password() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "sandbox"
            "#,
        )
        .unwrap();

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.identifier(), "MERCHANT");
        assert_eq!(credentials.password(), "secret");
        assert_eq!(credentials.environment(), &Environment::sandbox());
    }

    #[test]
    fn test_credentials_missing_env_var() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password_env = "BE2BILL_TEST_PASSWORD_THAT_IS_NEVER_SET"
            environment = "sandbox"
            "#,
        )
        .unwrap();

        let result = config.credentials();
        assert!(matches!(result, Err(Be2billError::ConfigError(msg)) if msg.contains("$BE2BILL_TEST")));
    }

    #[test]
    fn test_clients_from_config() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password = "secret"
            environment = "production"
            "#,
        )
        .unwrap();

        let direct_link = config.direct_link_client().unwrap();
        assert_eq!(direct_link.credentials().identifier(), "MERCHANT");

        let form = config.form_client().unwrap();
        assert_eq!(form.credentials().environment(), &Environment::production());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = parse(
            r#"
            identifier = "MERCHANT"
            password = "hunter2"
            environment = "sandbox"
            "#,
        )
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }
}
