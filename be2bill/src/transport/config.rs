//! Transport configuration types.
//!
//! TOML-deserializable settings for the HTTP transport and the host failover
//! loop.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Be2billError, Result};

/// Transport configuration from TOML.
///
/// Every field is optional and falls back to its default.
///
/// # Examples
///
/// ```toml
/// [transport]
/// timeout_secs = 30
/// connect_timeout_secs = 10
/// pool_max_idle_per_host = 10
/// http_version = "auto"
/// server_error_policy = "next_host"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TransportConfig {
    /// Time allowed for a single attempt, from sending to reading the whole
    /// response body, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum idle connections kept per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// HTTP version preference.
    #[serde(default)]
    pub http_version: HttpVersion,

    /// What to do when a host answers with a non-success status.
    #[serde(default)]
    pub server_error_policy: ServerErrorPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            pool_max_idle_per_host: default_pool_max_idle(),
            http_version: HttpVersion::default(),
            server_error_policy: ServerErrorPolicy::default(),
        }
    }
}

impl TransportConfig {
    /// Checks the timeouts against their bounds: `timeout_secs` in 1..=300,
    /// `connect_timeout_secs` in 1..=60.
    ///
    /// # Errors
    ///
    /// Returns [`Be2billError::ConfigError`] naming the first field out of
    /// bounds.
    pub fn validate(&self) -> Result<()> {
        check_bounds("timeout_secs", self.timeout_secs, MAX_TIMEOUT_SECS)?;
        check_bounds("connect_timeout_secs", self.connect_timeout_secs, MAX_CONNECT_TIMEOUT_SECS)
    }

    /// Returns the per-attempt timeout as Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the connect timeout as Duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP version preference.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 only (prior knowledge).
    Http2,
    /// Negotiated by the server.
    #[default]
    Auto,
}

/// Failover behavior when a host answers with a non-2xx status.
///
/// Connection failures always move on to the next host and timeouts never
/// do; only HTTP error statuses are configurable.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServerErrorPolicy {
    /// Try the next host.
    #[default]
    NextHost,
    /// Return [`Be2billError::ServerError`] immediately.
    Abort,
}

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_CONNECT_TIMEOUT_SECS: u64 = 60;

fn check_bounds(field: &str, value: u64, max: u64) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(Be2billError::ConfigError(format!("{field} must be between 1 and {max}, got {value}")))
    }
}

const fn default_pool_max_idle() -> usize {
    10
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_connect_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_config_default() {
        let config = TransportConfig::default();
        assert_eq!(config.pool_max_idle_per_host, 10);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.connect_timeout_secs, 10);
        assert_eq!(config.http_version, HttpVersion::Auto);
        assert_eq!(config.server_error_policy, ServerErrorPolicy::NextHost);
    }

    #[test]
    fn test_transport_config_durations() {
        let config = TransportConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_transport_config_from_toml() {
        let toml = "
            timeout_secs = 45
            connect_timeout_secs = 15
            pool_max_idle_per_host = 20
            http_version = \"http1\"
            server_error_policy = \"abort\"
        ";

        let config: TransportConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timeout_secs, 45);
        assert_eq!(config.connect_timeout_secs, 15);
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert_eq!(config.http_version, HttpVersion::Http1);
        assert_eq!(config.server_error_policy, ServerErrorPolicy::Abort);
    }

    #[test]
    fn test_transport_config_empty_toml() {
        let config: TransportConfig = toml::from_str("").unwrap();
        assert_eq!(config, TransportConfig::default());
    }

    #[test]
    fn test_transport_config_unknown_field() {
        let result: std::result::Result<TransportConfig, _> = toml::from_str("retries = 3");
        assert!(result.is_err());
    }

    #[test]
    fn test_server_error_policy_invalid_value() {
        let result: std::result::Result<TransportConfig, _> =
            toml::from_str("server_error_policy = \"retry\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let config = TransportConfig { timeout_secs: 1, connect_timeout_secs: 1, ..Default::default() };
        assert!(config.validate().is_ok());

        let config =
            TransportConfig { timeout_secs: 300, connect_timeout_secs: 60, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_out_of_range() {
        for timeout_secs in [0, 301] {
            let config = TransportConfig { timeout_secs, ..Default::default() };
            assert!(matches!(config.validate(), Err(Be2billError::ConfigError(_))));
        }
    }

    #[test]
    fn test_validate_connect_timeout_out_of_range() {
        for connect_timeout_secs in [0, 61] {
            let config = TransportConfig { connect_timeout_secs, ..Default::default() };
            assert!(matches!(config.validate(), Err(Be2billError::ConfigError(_))));
        }
    }
}
