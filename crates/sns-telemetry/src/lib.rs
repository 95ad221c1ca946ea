//! # SNS Telemetry
//!
//! Log output for the fake SNS server.
//!
//! Library crates log through `tracing` macros only; this crate decides
//! where those events go.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sns_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FAKE_SNS_LOG_LEVEL` | `info` | Log filter, falls back to `RUST_LOG` |
//! | `FAKE_SNS_JSON_LOGS` | `false` | JSON lines instead of pretty output |
//! | `FAKE_SNS_SERVICE_NAME` | `fake-sns` | Service name on the startup event |

mod config;
mod tracing_setup;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use tracing_setup::build_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global log subscriber described by `config`.
///
/// Fails if the filter directive does not parse or a subscriber is already
/// installed.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_tracing(config)
}
