//! # Domain Errors
//!
//! Error types for the notification service.
//!
//! Registry and queue errors are surfaced to the caller of the failing
//! operation. Delivery errors never leave the drain coordinator: they are
//! logged and recorded in the drain report.

use thiserror::Error;

/// Errors from topic, subscription and publish operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnsError {
    /// A topic with this name already exists.
    #[error("Topic already exists: {0}")]
    DuplicateTopic(String),

    /// Topic name violates the naming rules.
    #[error("Invalid topic name: {0:?}")]
    InvalidTopicName(String),

    /// No topic is registered under this ARN or name.
    #[error("Topic not found: {0}")]
    TopicNotFound(String),

    /// The subscription endpoint could not be turned into a target.
    #[error("Invalid subscription target {endpoint:?}: {reason}")]
    InvalidTarget {
        /// Endpoint as supplied by the caller
        endpoint: String,
        /// Why it was rejected
        reason: String,
    },

    /// The subscription protocol is not simulated.
    #[error("Unsupported protocol: {0}")]
    UnsupportedProtocol(String),

    /// Queue store failure.
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Errors from the in-memory queue store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No queue with this name.
    #[error("Queue not found: {0}")]
    QueueNotFound(String),

    /// A queue with this name already exists.
    #[error("Queue already exists: {0}")]
    DuplicateQueue(String),

    /// Queue name violates the naming rules.
    #[error("Invalid queue name: {0:?}")]
    InvalidQueueName(String),
}

/// Errors raised while handing an envelope to a subscriber.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The target queue rejected the entry.
    #[error("Queue delivery failed: {0}")]
    Queue(#[from] QueueError),

    /// Connection refused, timeout or other transport failure.
    #[error("HTTP transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status.
    #[error("HTTP endpoint returned status {0}")]
    Status(u16),

    /// The envelope could not be encoded.
    #[error("Envelope serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
