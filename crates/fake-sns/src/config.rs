//! Simulator configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default region used in generated ARNs.
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default account id used in generated ARNs.
pub const DEFAULT_ACCOUNT_ID: &str = "123456789012";

const DEFAULT_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for an `SnsContext`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnsConfig {
    /// Region segment of generated ARNs
    pub region: String,

    /// Account segment of generated ARNs
    pub account_id: String,

    /// Connect timeout for HTTP subscribers
    pub http_connect_timeout: Duration,

    /// Whole-request timeout for HTTP subscribers
    pub http_request_timeout: Duration,
}

impl Default for SnsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            account_id: DEFAULT_ACCOUNT_ID.to_string(),
            http_connect_timeout: DEFAULT_HTTP_CONNECT_TIMEOUT,
            http_request_timeout: DEFAULT_HTTP_REQUEST_TIMEOUT,
        }
    }
}

impl SnsConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FAKE_SNS_REGION`: ARN region (default: us-east-1)
    /// - `FAKE_SNS_ACCOUNT_ID`: ARN account (default: 123456789012)
    /// - `FAKE_SNS_HTTP_CONNECT_TIMEOUT_MS`: HTTP connect timeout (default: 2000)
    /// - `FAKE_SNS_HTTP_TIMEOUT_MS`: HTTP request timeout (default: 5000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            region: lookup("FAKE_SNS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),

            account_id: lookup("FAKE_SNS_ACCOUNT_ID")
                .unwrap_or_else(|| DEFAULT_ACCOUNT_ID.to_string()),

            http_connect_timeout: millis(
                "FAKE_SNS_HTTP_CONNECT_TIMEOUT_MS",
                DEFAULT_HTTP_CONNECT_TIMEOUT,
            ),

            http_request_timeout: millis("FAKE_SNS_HTTP_TIMEOUT_MS", DEFAULT_HTTP_REQUEST_TIMEOUT),
        }
    }
}
