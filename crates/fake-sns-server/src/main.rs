//! `fake-sns-server` binary.
//!
//! Configuration comes from the environment, command-line flags win.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fake_sns::SnsContext;
use fake_sns_server::{serve, ServerConfig};
use tracing::{info, warn};

/// Fake SNS: in-memory topics with on-demand delivery to queues and HTTP endpoints
#[derive(Parser, Debug)]
#[command(name = "fake-sns-server")]
#[command(version, about)]
struct Args {
    /// Admin API listen address (overrides FAKE_SNS_BIND)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Region used in generated ARNs (overrides FAKE_SNS_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Account id used in generated ARNs (overrides FAKE_SNS_ACCOUNT_ID)
    #[arg(long)]
    account_id: Option<String>,

    /// Log filter, e.g. `debug` or `fake_sns=debug,info` (overrides FAKE_SNS_LOG_LEVEL)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(region) = self.region {
            config.sns.region = region;
        }
        if let Some(account_id) = self.account_id {
            config.sns.account_id = account_id;
        }
        if let Some(level) = self.log_level {
            config.telemetry.log_level = level;
        }
        if self.json_logs {
            config.telemetry.json_logs = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to read configuration")?;
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    sns_telemetry::init_telemetry(&config.telemetry).context("Failed to initialize logging")?;

    let context = Arc::new(
        SnsContext::new(config.sns.clone()).context("Failed to build notification context")?,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    info!(version = fake_sns::VERSION, "Fake SNS is running. Press Ctrl+C to stop.");

    serve(listener, context, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Cannot listen for Ctrl+C, stopping");
        }
    })
    .await
    .context("Admin API server failed")?;

    info!("Shut down");
    Ok(())
}
