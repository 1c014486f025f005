//! Client configuration structures

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_READ_TIMEOUT_MS, HTTPS_PORT, MAX_RETRIES_LIMIT, PING_PATH, PONG_MARKER,
};
use crate::errors::{BeaconLinkError, Result};
use crate::impl_wire_name_conversions;

/// Complete configuration of the network core
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoint: EndpointConfig,
    pub tls: TrustPolicy,
    pub timeouts: TimeoutConfig,
    pub retry: RetryConfig,
    pub probe: ProbeConfig,
}

impl ClientConfig {
    /// Reject values the transport or dispatcher cannot work with
    ///
    /// An empty host is allowed here: the endpoint may still be supplied
    /// later through the settings store.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.port == 0 {
            return Err(BeaconLinkError::Config("endpoint.port must be between 1 and 65535".into()));
        }
        if self.retry.max_retries > MAX_RETRIES_LIMIT {
            return Err(BeaconLinkError::Config(format!(
                "retry.max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.retry.max_retries
            )));
        }
        if self.timeouts.connect_ms == 0 || self.timeouts.read_ms == 0 {
            return Err(BeaconLinkError::Config("timeouts must be greater than zero".into()));
        }
        if self.probe.expect.is_empty() {
            return Err(BeaconLinkError::Config("probe.expect cannot be empty".into()));
        }
        Ok(())
    }
}

/// Where the control server lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub host: String,
    pub port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self { host: String::new(), port: HTTPS_PORT }
    }
}

/// Certificate handling for HTTPS connections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustPolicy {
    /// Standard certificate and hostname validation
    #[default]
    Verify,
    /// Accept any server certificate and skip hostname checks
    TrustAny,
}

impl_wire_name_conversions!(TrustPolicy {
    Verify => "verify",
    TrustAny => "trust-any",
});

impl TrustPolicy {
    pub fn accepts_invalid_certs(&self) -> bool {
        matches!(self, Self::TrustAny)
    }
}

/// Connect and read timeouts in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub connect_ms: u64,
    pub read_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { connect_ms: DEFAULT_CONNECT_TIMEOUT_MS, read_ms: DEFAULT_READ_TIMEOUT_MS }
    }
}

impl TimeoutConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_ms)
    }
}

/// Retry budget and backoff base for dispatched requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: DEFAULT_MAX_RETRIES, base_delay_ms: DEFAULT_BASE_DELAY_MS }
    }
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

/// Connectivity probe request and expected marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub path: String,
    pub expect: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { path: PING_PATH.to_string(), expect: PONG_MARKER.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.tls, TrustPolicy::Verify);
        assert_eq!(config.timeouts.connect_timeout(), Duration::from_secs(15));
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.base_delay(), Duration::from_millis(500));
        assert_eq!(config.probe.path, "/ping");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"endpoint":{"host":"10.0.0.5","port":8443},"tls":"trust-any"}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint.host, "10.0.0.5");
        assert_eq!(config.endpoint.port, 8443);
        assert!(config.tls.accepts_invalid_certs());
        assert_eq!(config.retry, RetryConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClientConfig::default();
        config.endpoint.port = 0;
        assert!(matches!(config.validate(), Err(BeaconLinkError::Config(_))));

        let mut config = ClientConfig::default();
        config.retry.max_retries = 11;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.timeouts.read_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_trust_policy_parses_from_env_style_strings() {
        assert_eq!("verify".parse::<TrustPolicy>(), Ok(TrustPolicy::Verify));
        assert_eq!("Trust-Any".parse::<TrustPolicy>(), Ok(TrustPolicy::TrustAny));
        assert!("off".parse::<TrustPolicy>().is_err());
    }
}
