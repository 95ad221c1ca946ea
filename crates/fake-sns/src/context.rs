//! # Process Context
//!
//! One explicit owner for everything the simulator keeps in memory: the
//! subscription registry, the pending message store, the fake queue store
//! and the drain coordinator wired to both adapters.
//!
//! Tests create a context per case (or call `reset()` between cases) instead
//! of sharing process-wide registries.

use crate::adapters::{
    HttpDeliveryAdapter, InMemoryQueueStore, QueueDeliveryAdapter, ReqwestTransport,
};
use crate::config::SnsConfig;
use crate::domain::{
    ArnFormatter, DeliveryError, EnvelopeRenderer, MessageId, MessageStore, SnsError,
    Subscription, SubscriptionRegistry, Target, Topic, TopicArn,
};
use crate::ports::inbound::NotificationApi;
use crate::ports::outbound::{
    HttpTransport, IdGenerator, QueueStore, SystemTimeSource, TimeSource, UuidGenerator,
};
use crate::service::{DrainCoordinator, DrainReport, DrainScope};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Point-in-time view of a context, for the admin surface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub topics: Vec<Topic>,
    pub subscriptions: Vec<Subscription>,
    pub pending_messages: usize,
    pub queues: Vec<String>,
}

/// In-memory notification service.
pub struct SnsContext {
    config: SnsConfig,
    registry: Arc<SubscriptionRegistry>,
    store: Arc<MessageStore>,
    queues: Arc<InMemoryQueueStore>,
    coordinator: DrainCoordinator,
}

impl SnsContext {
    /// Build a context with a `reqwest` transport for HTTP subscribers.
    ///
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(config: SnsConfig) -> Result<Self, DeliveryError> {
        let transport =
            ReqwestTransport::new(config.http_connect_timeout, config.http_request_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Build a context posting HTTP notifications through `transport`.
    pub fn with_transport(config: SnsConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_collaborators(
            config,
            transport,
            Arc::new(UuidGenerator),
            Arc::new(SystemTimeSource),
        )
    }

    /// Build a context from explicit collaborators.
    pub fn with_collaborators(
        config: SnsConfig,
        transport: Arc<dyn HttpTransport>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        let arns = ArnFormatter::new(config.region.clone(), config.account_id.clone());
        let registry = Arc::new(SubscriptionRegistry::new(arns, ids.clone()));
        let store = Arc::new(MessageStore::new(ids, clock.clone()));
        let queues = Arc::new(InMemoryQueueStore::new());

        let coordinator = DrainCoordinator::new(
            registry.clone(),
            store.clone(),
            EnvelopeRenderer::new(clock),
            Arc::new(QueueDeliveryAdapter::new(queues.clone())),
            Arc::new(HttpDeliveryAdapter::new(transport)),
        );

        Self {
            config,
            registry,
            store,
            queues,
            coordinator,
        }
    }

    /// Configuration this context was built with.
    pub fn config(&self) -> &SnsConfig {
        &self.config
    }

    /// Topics and subscriptions.
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// Messages published but not yet drained.
    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    /// The fake queue service subscribers write to.
    pub fn queues(&self) -> &InMemoryQueueStore {
        &self.queues
    }

    /// Create a queue that can be subscribed to a topic.
    pub fn create_queue(&self, name: &str) -> Result<(), SnsError> {
        Ok(self.queues.create_queue(name)?)
    }

    /// ARN of a queue in this context's region and account.
    pub fn queue_arn(&self, name: &str) -> String {
        self.registry.arns().queue_arn(name)
    }

    /// Look up a topic's ARN by name.
    pub fn topic_arn(&self, name: &str) -> Result<TopicArn, SnsError> {
        self.registry
            .topic_by_name(name)
            .map(|topic| topic.arn)
            .ok_or_else(|| SnsError::TopicNotFound(name.to_string()))
    }

    /// Delete a topic, its subscriptions and its pending messages.
    pub fn delete_topic(&self, arn: &TopicArn) -> Result<Topic, SnsError> {
        let topic = self
            .registry
            .delete_topic(arn)
            .ok_or_else(|| SnsError::TopicNotFound(arn.to_string()))?;
        let purged = self.store.purge_topic(arn);
        self.coordinator.forget_topic(arn);

        debug!(topic_arn = %arn, purged, "Pending messages discarded");
        Ok(topic)
    }

    /// Current topics, subscriptions, pending count and queues.
    pub fn summary(&self) -> ContextSummary {
        ContextSummary {
            topics: self.registry.list_topics(),
            subscriptions: self.registry.list_subscriptions(),
            pending_messages: self.store.len(),
            queues: self.queues.queue_names(),
        }
    }

    /// Forget every topic, subscription, pending message and queue.
    pub fn reset(&self) {
        self.registry.clear();
        self.store.clear();
        self.queues.clear();
        self.coordinator.reset();

        info!("Context reset");
    }

    fn require_topic(&self, arn: &TopicArn) -> Result<(), SnsError> {
        match self.registry.topic(arn) {
            Some(_) => Ok(()),
            None => Err(SnsError::TopicNotFound(arn.to_string())),
        }
    }
}

#[async_trait]
impl NotificationApi for SnsContext {
    async fn create_topic(&self, name: &str) -> Result<Topic, SnsError> {
        self.registry.create_topic(name)
    }

    async fn subscribe(&self, topic: &TopicArn, target: Target) -> Result<Subscription, SnsError> {
        self.registry.subscribe(topic, target)
    }

    async fn publish_with_subject(
        &self,
        topic: &TopicArn,
        body: &str,
        subject: Option<String>,
    ) -> Result<MessageId, SnsError> {
        self.require_topic(topic)?;
        Ok(self.store.publish(topic, body, subject))
    }

    async fn drain(&self, message_id: Option<MessageId>) -> DrainReport {
        self.coordinator.drain(DrainScope::from(message_id)).await
    }
}
