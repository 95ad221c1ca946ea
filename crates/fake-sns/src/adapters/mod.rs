//! # Adapters Layer (Hexagonal Architecture)
//!
//! Delivery adapters, one per target kind, and the production
//! implementations of the outbound ports.

mod http;
mod queue;
mod queue_store;

pub use http::{
    HttpDeliveryAdapter, ReqwestTransport, HEADER_MESSAGE_ID, HEADER_MESSAGE_TYPE,
    HEADER_SUBSCRIPTION_ARN, HEADER_TOPIC_ARN, NOTIFICATION_CONTENT_TYPE,
};
pub use queue::QueueDeliveryAdapter;
pub use queue_store::{InMemoryQueueStore, QueueEntry};

use crate::domain::{DeliveryError, Envelope};
use async_trait::async_trait;

/// Hands a rendered envelope to one kind of destination.
#[async_trait]
pub trait DeliveryAdapter<T: ?Sized + Sync>: Send + Sync {
    /// Deliver once. No retries, no partial state.
    async fn deliver(&self, envelope: &Envelope, target: &T) -> Result<(), DeliveryError>;
}
