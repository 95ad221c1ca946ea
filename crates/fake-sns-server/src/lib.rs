//! # Fake SNS Server
//!
//! Runs an `SnsContext` behind a small JSON control API so that test suites
//! written in any language can create topics, publish and trigger drains.
//!
//! ```text
//! test suite ──HTTP──→ [admin API] ──→ SnsContext ──drain──→ queues / HTTP callbacks
//! ```

pub mod api;
pub mod config;

pub use api::{router, ApiError, AppState};
pub use config::{ConfigError, ServerConfig, DEFAULT_PORT};

use fake_sns::SnsContext;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serve the admin API on `listener` until `shutdown` completes.
pub async fn serve<F>(
    listener: TcpListener,
    context: Arc<SnsContext>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, region = %context.config().region, "Admin API listening");

    axum::serve(listener, router(context))
        .with_graceful_shutdown(shutdown)
        .await
}
