//! # Drain Coordinator
//!
//! Performs all pending deliveries on demand.
//!
//! ## Drain Pass
//!
//! ```text
//! [SELECT] ──→ [FAN OUT] ──→ [DELIVER] ──→ [COMMIT]
//!    │             │             │             │
//!    │             │             │             └─ mark_delivered (remove from store)
//!    │             │             └─ render + adapter per subscription, concurrently
//!    │             └─ subscription snapshot taken now (zero subscribers is fine)
//!    └─ one message id, or every topic with pending messages
//! ```
//!
//! Drains of the same topic are serialized by a per-topic async mutex, so two
//! overlapping drains can never both select the same message. Different
//! topics drain concurrently. Delivery failures are logged and recorded in
//! the report; they never fail the drain and never keep a message pending.

use crate::adapters::DeliveryAdapter;
use crate::domain::{
    EnvelopeRenderer, HttpEndpoint, Message, MessageId, MessageStore, Protocol, QueueRef,
    Subscription, SubscriptionArn, SubscriptionRegistry, Target, TopicArn,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Which messages a drain operates on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrainScope {
    /// Everything currently pending, across all topics.
    All,
    /// Exactly this message, if it is still pending.
    Message(MessageId),
}

impl From<Option<MessageId>> for DrainScope {
    fn from(id: Option<MessageId>) -> Self {
        id.map_or(Self::All, Self::Message)
    }
}

/// Result of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// The adapter accepted the envelope.
    Delivered,
    /// The adapter failed; the message was still committed.
    Failed {
        /// Adapter error text
        error: String,
    },
}

/// One (message, subscription) attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub message_id: MessageId,
    pub subscription_arn: SubscriptionArn,
    pub protocol: Protocol,
    pub endpoint: String,
    pub outcome: DeliveryOutcome,
}

/// What a drain call did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Messages removed from the pending set, in commit order per topic.
    pub drained: Vec<MessageId>,
    /// Every delivery attempted.
    pub deliveries: Vec<DeliveryRecord>,
}

impl DrainReport {
    /// True when the drain found nothing pending.
    pub fn is_empty(&self) -> bool {
        self.drained.is_empty()
    }

    /// Attempts that succeeded.
    pub fn delivered_count(&self) -> usize {
        self.deliveries
            .iter()
            .filter(|d| d.outcome == DeliveryOutcome::Delivered)
            .count()
    }

    /// Attempts that failed.
    pub fn failed_count(&self) -> usize {
        self.deliveries.len() - self.delivered_count()
    }

    fn merge(&mut self, other: DrainReport) {
        self.drained.extend(other.drained);
        self.deliveries.extend(other.deliveries);
    }
}

/// Joins the message store and the subscription registry at drain time.
///
/// Each topic pass runs on its own tokio task. A caller that stops polling
/// `drain` does not stop the pass: deliveries already started still finish
/// and the message is still committed.
pub struct DrainCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    registry: Arc<SubscriptionRegistry>,
    store: Arc<MessageStore>,
    renderer: EnvelopeRenderer,
    queue_adapter: Arc<dyn DeliveryAdapter<QueueRef>>,
    http_adapter: Arc<dyn DeliveryAdapter<HttpEndpoint>>,
    topic_locks: parking_lot::Mutex<HashMap<TopicArn, Arc<tokio::sync::Mutex<()>>>>,
}

impl DrainCoordinator {
    /// Create a coordinator over the given store, registry and adapters.
    pub fn new(
        registry: Arc<SubscriptionRegistry>,
        store: Arc<MessageStore>,
        renderer: EnvelopeRenderer,
        queue_adapter: Arc<dyn DeliveryAdapter<QueueRef>>,
        http_adapter: Arc<dyn DeliveryAdapter<HttpEndpoint>>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry,
                store,
                renderer,
                queue_adapter,
                http_adapter,
                topic_locks: parking_lot::Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Deliver pending messages in `scope`.
    ///
    /// Returns once every attempted delivery has finished. Nothing pending is
    /// a no-op, never an error. Must be called inside a tokio runtime.
    pub async fn drain(&self, scope: DrainScope) -> DrainReport {
        let passes: Vec<JoinHandle<DrainReport>> = match scope {
            DrainScope::All => self
                .shared
                .store
                .pending_topics()
                .into_iter()
                .map(|topic| self.spawn_pass(topic, None))
                .collect(),
            DrainScope::Message(id) => {
                let Some(message) = self.shared.store.pending_message(&id) else {
                    debug!(message_id = %id, "Drain requested for message that is not pending");
                    return DrainReport::default();
                };
                vec![self.spawn_pass(message.topic_arn, Some(id))]
            }
        };

        let mut report = DrainReport::default();
        for pass in join_all(passes).await {
            match pass {
                Ok(topic_report) => report.merge(topic_report),
                Err(e) => error!(error = %e, "Drain pass did not complete"),
            }
        }

        if !report.is_empty() {
            info!(
                messages = report.drained.len(),
                delivered = report.delivered_count(),
                failed = report.failed_count(),
                "Drain complete"
            );
        }
        report
    }

    /// Forget the drain lock of a deleted topic.
    pub fn forget_topic(&self, topic: &TopicArn) {
        self.shared.topic_locks.lock().remove(topic);
    }

    /// Forget per-topic locks; used when the owning context is reset.
    pub fn reset(&self) {
        self.shared.topic_locks.lock().clear();
    }

    pub(crate) fn tracked_topics(&self) -> usize {
        self.shared.topic_locks.lock().len()
    }

    fn spawn_pass(&self, topic: TopicArn, only: Option<MessageId>) -> JoinHandle<DrainReport> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.drain_topic(&topic, only.as_ref()).await })
    }
}

impl Shared {
    fn topic_lock(&self, topic: &TopicArn) -> Arc<tokio::sync::Mutex<()>> {
        self.topic_locks
            .lock()
            .entry(topic.clone())
            .or_default()
            .clone()
    }

    async fn drain_topic(&self, topic: &TopicArn, only: Option<&MessageId>) -> DrainReport {
        let lock = self.topic_lock(topic);
        let _guard = lock.lock().await;

        // Select under the topic lock: anything published from here on waits
        // for the next drain.
        let messages = match only {
            Some(id) => self.store.pending_for_message(topic, id),
            None => self.store.pending_for(topic),
        };

        let mut report = DrainReport::default();
        for message in messages {
            let subscriptions = self.registry.subscriptions_for(topic);
            if subscriptions.is_empty() {
                debug!(
                    topic_arn = %topic,
                    message_id = %message.id,
                    "No subscribers, consuming message"
                );
            }

            let records = self.fan_out(topic, &message, &subscriptions).await;

            // Commit
            self.store.mark_delivered(&message.id);
            report.drained.push(message.id);
            report.deliveries.extend(records);
        }
        report
    }

    async fn fan_out(
        &self,
        topic: &TopicArn,
        message: &Message,
        subscriptions: &[Subscription],
    ) -> Vec<DeliveryRecord> {
        join_all(
            subscriptions
                .iter()
                .map(|subscription| self.deliver_one(topic, message, subscription)),
        )
        .await
    }

    async fn deliver_one(
        &self,
        topic: &TopicArn,
        message: &Message,
        subscription: &Subscription,
    ) -> DeliveryRecord {
        let envelope = self.renderer.render(topic, message, subscription);
        let result = match &subscription.target {
            Target::Queue(queue) => self.queue_adapter.deliver(&envelope, queue).await,
            Target::Http(endpoint) => self.http_adapter.deliver(&envelope, endpoint).await,
        };

        let outcome = match result {
            Ok(()) => DeliveryOutcome::Delivered,
            Err(e) => {
                warn!(
                    topic_arn = %topic,
                    message_id = %message.id,
                    subscription_arn = %subscription.arn,
                    endpoint = subscription.target.endpoint(),
                    error = %e,
                    "Delivery failed"
                );
                DeliveryOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        DeliveryRecord {
            message_id: message.id.clone(),
            subscription_arn: subscription.arn.clone(),
            protocol: subscription.target.protocol(),
            endpoint: subscription.target.endpoint().to_string(),
            outcome,
        }
    }
}
