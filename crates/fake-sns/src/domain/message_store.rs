//! # Message Store
//!
//! Published-but-not-yet-drained messages, per topic, in publish order.
//!
//! Messages live in an arena of slots; two indexes point into it:
//! message id -> slot, and topic -> ordered slots. Committing a delivery
//! removes the message from the arena and both indexes under one lock, which
//! is what makes a second drain of the same message a no-op.

use super::entities::{Message, MessageId, TopicArn};
use crate::ports::outbound::{IdGenerator, TimeSource};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
struct Arena {
    slots: Vec<Option<Message>>,
    free: Vec<usize>,
    by_id: HashMap<MessageId, usize>,
    by_topic: HashMap<TopicArn, Vec<usize>>,
}

impl Arena {
    fn insert(&mut self, message: Message) {
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(message.clone());
                slot
            }
            None => {
                self.slots.push(Some(message.clone()));
                self.slots.len() - 1
            }
        };
        self.by_id.insert(message.id, slot);
        self.by_topic.entry(message.topic_arn).or_default().push(slot);
    }

    fn get(&self, slot: usize) -> Option<&Message> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    fn remove(&mut self, id: &MessageId) -> Option<Message> {
        let slot = self.by_id.remove(id)?;
        let message = self.slots[slot].take()?;
        self.free.push(slot);

        if let Some(order) = self.by_topic.get_mut(&message.topic_arn) {
            order.retain(|&s| s != slot);
            if order.is_empty() {
                self.by_topic.remove(&message.topic_arn);
            }
        }
        Some(message)
    }

    fn pending_for(&self, topic: &TopicArn) -> Vec<Message> {
        self.by_topic
            .get(topic)
            .map(|order| order.iter().filter_map(|&s| self.get(s).cloned()).collect())
            .unwrap_or_default()
    }
}

/// Pending messages for every topic.
pub struct MessageStore {
    arena: Mutex<Arena>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn TimeSource>,
}

impl MessageStore {
    /// Create an empty store.
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn TimeSource>) -> Self {
        Self {
            arena: Mutex::new(Arena::default()),
            ids,
            clock,
        }
    }

    /// Append a message to a topic's pending sequence.
    ///
    /// Every call yields a distinct message, even for identical bodies.
    pub fn publish(&self, topic: &TopicArn, body: &str, subject: Option<String>) -> MessageId {
        let message = Message {
            id: MessageId::new(self.ids.next_id()),
            topic_arn: topic.clone(),
            body: body.to_string(),
            subject,
            published_at: self.clock.now(),
        };
        let id = message.id.clone();
        self.arena.lock().insert(message);

        debug!(topic_arn = %topic, message_id = %id, "Message published");
        id
    }

    /// Pending messages of a topic, in publish order.
    pub fn pending_for(&self, topic: &TopicArn) -> Vec<Message> {
        self.arena.lock().pending_for(topic)
    }

    /// The pending message with this id, if it is still pending.
    pub fn pending_message(&self, id: &MessageId) -> Option<Message> {
        let arena = self.arena.lock();
        arena.by_id.get(id).and_then(|&slot| arena.get(slot).cloned())
    }

    /// `pending_for` narrowed to a single id: zero or one message.
    pub fn pending_for_message(&self, topic: &TopicArn, id: &MessageId) -> Vec<Message> {
        self.pending_message(id)
            .filter(|message| &message.topic_arn == topic)
            .into_iter()
            .collect()
    }

    /// Topics with at least one pending message.
    pub fn pending_topics(&self) -> Vec<TopicArn> {
        let mut topics: Vec<TopicArn> = self.arena.lock().by_topic.keys().cloned().collect();
        topics.sort();
        topics
    }

    /// Remove a message from the pending set.
    ///
    /// Returns `false` if it was no longer pending.
    pub fn mark_delivered(&self, id: &MessageId) -> bool {
        self.arena.lock().remove(id).is_some()
    }

    /// Discard every pending message of a topic.
    pub fn purge_topic(&self, topic: &TopicArn) -> usize {
        let mut arena = self.arena.lock();
        let ids: Vec<MessageId> = arena
            .pending_for(topic)
            .into_iter()
            .map(|message| message.id)
            .collect();
        for id in &ids {
            arena.remove(id);
        }
        ids.len()
    }

    /// Total pending messages.
    pub fn len(&self) -> usize {
        self.arena.lock().by_id.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop everything.
    pub fn clear(&self) {
        *self.arena.lock() = Arena::default();
    }
}
