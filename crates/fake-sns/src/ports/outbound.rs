//! # Outbound Ports
//!
//! Collaborators the notification core relies on but does not own:
//! the queue store, the HTTP transport, identifier generation and time.

use crate::domain::{DeliveryError, QueueError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Queue-like store used as the queue adapter's write target.
pub trait QueueStore: Send + Sync {
    /// Create an empty queue.
    fn create_queue(&self, name: &str) -> Result<(), QueueError>;

    /// Append one visible entry.
    fn enqueue(&self, queue: &str, body: String) -> Result<(), QueueError>;

    /// Number of visible entries.
    fn visible_messages(&self, queue: &str) -> Result<usize, QueueError>;
}

/// A single outbound POST.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    /// Destination URL.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: String,
}

/// HTTP client capable of one POST with custom headers.
///
/// Returns the response status. Timeouts belong to the implementation.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue the request once.
    async fn post(&self, request: HttpRequest) -> Result<u16, DeliveryError>;
}

/// Source of unique identifiers for subscriptions and messages.
pub trait IdGenerator: Send + Sync {
    /// Return a fresh identifier.
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Time source for publish and render timestamps.
///
/// Abstracted to allow testing with deterministic time.
pub trait TimeSource: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time source for testing.
#[cfg(test)]
pub struct MockTimeSource {
    time: parking_lot::Mutex<DateTime<Utc>>,
}

#[cfg(test)]
impl MockTimeSource {
    pub fn new(initial: DateTime<Utc>) -> Self {
        Self {
            time: parking_lot::Mutex::new(initial),
        }
    }

    pub fn advance(&self, by: chrono::Duration) {
        let mut time = self.time.lock();
        *time += by;
    }
}

#[cfg(test)]
impl TimeSource for MockTimeSource {
    fn now(&self) -> DateTime<Utc> {
        *self.time.lock()
    }
}

/// Predictable ids (`id-1`, `id-2`, ...) for testing.
#[cfg(test)]
#[derive(Default)]
pub struct SequentialIdGenerator {
    next: std::sync::atomic::AtomicU64,
}

#[cfg(test)]
impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self
            .next
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1;
        format!("id-{n}")
    }
}
