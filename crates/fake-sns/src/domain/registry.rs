//! # Subscription Registry
//!
//! Topics and, per topic, the ordered list of subscriptions.
//!
//! Insertion order of subscriptions is preserved and governs the order in
//! which deliveries are started. `subscriptions_for` hands out a cloned
//! snapshot, so later `subscribe` calls never reach into a drain that has
//! already captured its subscriber list.

use super::arn::ArnFormatter;
use super::entities::{validate_topic_name, Subscription, SubscriptionArn, Target, Topic, TopicArn};
use super::errors::SnsError;
use crate::ports::outbound::IdGenerator;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

struct TopicEntry {
    topic: Topic,
    subscriptions: Vec<Subscription>,
}

#[derive(Default)]
struct RegistryState {
    /// Topics in creation order.
    topics: Vec<TopicEntry>,
    /// Topic name -> position in `topics`.
    by_name: HashMap<String, usize>,
    /// Topic ARN -> position in `topics`.
    by_arn: HashMap<TopicArn, usize>,
}

impl RegistryState {
    fn reindex(&mut self) {
        self.by_name.clear();
        self.by_arn.clear();
        for (idx, entry) in self.topics.iter().enumerate() {
            self.by_name.insert(entry.topic.name.clone(), idx);
            self.by_arn.insert(entry.topic.arn.clone(), idx);
        }
    }

    fn entry(&self, arn: &TopicArn) -> Option<&TopicEntry> {
        self.by_arn.get(arn).map(|&idx| &self.topics[idx])
    }
}

/// Holds topics and their subscriptions.
pub struct SubscriptionRegistry {
    state: RwLock<RegistryState>,
    arns: ArnFormatter,
    ids: Arc<dyn IdGenerator>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new(arns: ArnFormatter, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            arns,
            ids,
        }
    }

    /// Create a topic.
    ///
    /// # Errors
    /// - `InvalidTopicName`: name is empty, too long or has illegal characters
    /// - `DuplicateTopic`: a topic with this name exists
    pub fn create_topic(&self, name: &str) -> Result<Topic, SnsError> {
        validate_topic_name(name)?;

        let mut state = self.state.write();
        if state.by_name.contains_key(name) {
            return Err(SnsError::DuplicateTopic(name.to_string()));
        }

        let topic = Topic {
            name: name.to_string(),
            arn: self.arns.topic_arn(name),
        };
        let idx = state.topics.len();
        state.by_name.insert(topic.name.clone(), idx);
        state.by_arn.insert(topic.arn.clone(), idx);
        state.topics.push(TopicEntry {
            topic: topic.clone(),
            subscriptions: Vec::new(),
        });

        debug!(topic_arn = %topic.arn, "Topic created");
        Ok(topic)
    }

    /// Attach a target to a topic.
    ///
    /// # Errors
    /// - `TopicNotFound`: no topic with this ARN
    pub fn subscribe(&self, topic: &TopicArn, target: Target) -> Result<Subscription, SnsError> {
        let mut state = self.state.write();
        let idx = *state
            .by_arn
            .get(topic)
            .ok_or_else(|| SnsError::TopicNotFound(topic.to_string()))?;

        let subscription = Subscription {
            arn: self.arns.subscription_arn(topic, &self.ids.next_id()),
            topic_arn: topic.clone(),
            target,
        };
        state.topics[idx].subscriptions.push(subscription.clone());

        debug!(
            topic_arn = %topic,
            subscription_arn = %subscription.arn,
            protocol = %subscription.target.protocol(),
            "Subscription created"
        );
        Ok(subscription)
    }

    /// Snapshot of a topic's subscriptions in insertion order.
    ///
    /// Unknown topics have no subscribers.
    pub fn subscriptions_for(&self, topic: &TopicArn) -> Vec<Subscription> {
        self.state
            .read()
            .entry(topic)
            .map(|entry| entry.subscriptions.clone())
            .unwrap_or_default()
    }

    /// Look up a topic by ARN.
    pub fn topic(&self, arn: &TopicArn) -> Option<Topic> {
        self.state.read().entry(arn).map(|entry| entry.topic.clone())
    }

    /// Look up a topic by name.
    pub fn topic_by_name(&self, name: &str) -> Option<Topic> {
        let state = self.state.read();
        state
            .by_name
            .get(name)
            .map(|&idx| state.topics[idx].topic.clone())
    }

    /// All topics in creation order.
    pub fn list_topics(&self) -> Vec<Topic> {
        self.state
            .read()
            .topics
            .iter()
            .map(|entry| entry.topic.clone())
            .collect()
    }

    /// Every subscription, grouped by topic in creation order.
    pub fn list_subscriptions(&self) -> Vec<Subscription> {
        self.state
            .read()
            .topics
            .iter()
            .flat_map(|entry| entry.subscriptions.iter().cloned())
            .collect()
    }

    /// Look up a subscription by ARN.
    pub fn subscription(&self, arn: &SubscriptionArn) -> Option<Subscription> {
        self.state
            .read()
            .topics
            .iter()
            .flat_map(|entry| entry.subscriptions.iter())
            .find(|sub| &sub.arn == arn)
            .cloned()
    }

    /// Remove a topic and its subscriptions.
    ///
    /// Returns the removed topic, `None` if it did not exist.
    pub fn delete_topic(&self, arn: &TopicArn) -> Option<Topic> {
        let mut state = self.state.write();
        let idx = state.by_arn.get(arn).copied()?;
        let removed = state.topics.remove(idx);
        state.reindex();

        debug!(
            topic_arn = %arn,
            subscriptions = removed.subscriptions.len(),
            "Topic deleted"
        );
        Some(removed.topic)
    }

    /// Number of topics.
    pub fn topic_count(&self) -> usize {
        self.state.read().topics.len()
    }

    /// Drop every topic and subscription.
    pub fn clear(&self) {
        *self.state.write() = RegistryState::default();
    }

    /// ARN formatter shared with the rest of the context.
    pub fn arns(&self) -> &ArnFormatter {
        &self.arns
    }
}
