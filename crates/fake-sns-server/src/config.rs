//! Server configuration with validation.

use fake_sns::SnsConfig;
use sns_telemetry::TelemetryConfig;
use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use thiserror::Error;

/// Default admin API port.
pub const DEFAULT_PORT: u16 = 9911;

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Admin API listen address
    pub bind_addr: SocketAddr,
    /// Simulator settings
    pub sns: SnsConfig,
    /// Log output
    pub telemetry: TelemetryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            sns: SnsConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// `FAKE_SNS_BIND` sets the listen address (default: 127.0.0.1:9911);
    /// see `SnsConfig::from_env` and `TelemetryConfig::from_env` for the rest.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = match lookup("FAKE_SNS_BIND") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddress(raw))?,
            None => Self::default().bind_addr,
        };

        Ok(Self {
            bind_addr,
            sns: SnsConfig::from_lookup(&lookup),
            telemetry: TelemetryConfig::from_lookup(&lookup),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sns.region.trim().is_empty() {
            return Err(ConfigError::Invalid("region cannot be empty".into()));
        }
        if self.sns.account_id.trim().is_empty() {
            return Err(ConfigError::Invalid("account id cannot be empty".into()));
        }
        if self.sns.http_connect_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "http connect timeout cannot be 0".into(),
            ));
        }
        if self.sns.http_request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "http request timeout cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Listen address does not parse
    #[error("invalid bind address: {0}")]
    InvalidBindAddress(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
