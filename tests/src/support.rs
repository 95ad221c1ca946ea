//! Shared fixtures.

use axum::{
    http::{HeaderMap, StatusCode, Uri},
    Router,
};
use fake_sns::{SnsConfig, SnsContext};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Context with short HTTP timeouts so unreachable endpoints fail fast.
pub fn context() -> SnsContext {
    SnsContext::new(SnsConfig {
        http_connect_timeout: Duration::from_millis(500),
        http_request_timeout: Duration::from_secs(2),
        ..SnsConfig::default()
    })
    .expect("reqwest client builds")
}

/// Parsed envelopes on a queue, oldest first.
pub fn queue_envelopes(ctx: &SnsContext, queue: &str) -> Vec<Value> {
    ctx.queues()
        .entries(queue)
        .expect("queue exists")
        .into_iter()
        .map(|entry| serde_json::from_str(&entry.body).expect("entry is JSON"))
        .collect()
}

/// `Message` fields on a queue, oldest first.
pub fn queue_bodies(ctx: &SnsContext, queue: &str) -> Vec<String> {
    queue_envelopes(ctx, queue)
        .into_iter()
        .map(|envelope| envelope["Message"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// An address nothing listens on.
pub fn closed_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr")
}

/// One POST seen by an `HttpReceiver`.
#[derive(Clone, Debug)]
pub struct ReceivedRequest {
    pub path: String,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ReceivedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("body is JSON")
    }
}

/// HTTP subscriber endpoint recording every request it receives.
pub struct HttpReceiver {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl HttpReceiver {
    /// Receiver answering 200.
    pub async fn start() -> Self {
        Self::with_status(StatusCode::OK).await
    }

    /// Receiver answering `status` to everything.
    pub async fn with_status(status: StatusCode) -> Self {
        Self::serve(status, Duration::ZERO).await
    }

    /// Receiver that records each request on arrival and answers 200 after
    /// `delay`.
    pub async fn slow(delay: Duration) -> Self {
        Self::serve(StatusCode::OK, delay).await
    }

    async fn serve(status: StatusCode, delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let app = Router::new().fallback(move |uri: Uri, headers: HeaderMap, body: String| {
            let sink = sink.clone();
            async move {
                let headers = headers
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            value.to_str().unwrap_or_default().to_string(),
                        )
                    })
                    .collect();
                sink.lock().push(ReceivedRequest {
                    path: uri.path().to_string(),
                    headers,
                    body,
                });
                tokio::time::sleep(delay).await;
                status
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind receiver");
        let addr = listener.local_addr().expect("receiver addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, received }
    }

    /// Absolute URL for `path` on this receiver.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().clone()
    }
}

/// Admin API on an ephemeral port, plus the context behind it.
pub async fn spawn_admin() -> (String, Arc<SnsContext>) {
    let ctx = Arc::new(context());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind admin");
    let addr = listener.local_addr().expect("admin addr");
    let served = ctx.clone();
    tokio::spawn(async move {
        let _ = fake_sns_server::serve(listener, served, std::future::pending()).await;
    });
    (format!("http://{addr}"), ctx)
}
