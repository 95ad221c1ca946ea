//! Queue delivery adapter.
//!
//! Serializes the envelope to flat JSON text and enqueues it. Enqueue is
//! synchronous: it either lands one visible entry or fails.

use super::DeliveryAdapter;
use crate::domain::{DeliveryError, Envelope, QueueRef};
use crate::ports::outbound::QueueStore;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Delivers envelopes onto queues.
pub struct QueueDeliveryAdapter {
    queues: Arc<dyn QueueStore>,
}

impl QueueDeliveryAdapter {
    /// Create an adapter writing to `queues`.
    pub fn new(queues: Arc<dyn QueueStore>) -> Self {
        Self { queues }
    }
}

#[async_trait]
impl DeliveryAdapter<QueueRef> for QueueDeliveryAdapter {
    async fn deliver(&self, envelope: &Envelope, target: &QueueRef) -> Result<(), DeliveryError> {
        let body = envelope.to_json()?;
        self.queues.enqueue(target.name(), body)?;

        debug!(
            queue = %target,
            message_id = %envelope.message_id,
            "Notification enqueued"
        );
        Ok(())
    }
}
