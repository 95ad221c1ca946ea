//! In-memory queue store.
//!
//! Stands in for SQS: named queues holding visible entries. Delivery only
//! ever appends; tests and the admin surface read entries back.

use crate::domain::{entities::is_resource_name, QueueError, MAX_QUEUE_NAME_LEN};
use crate::ports::outbound::QueueStore;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;
use uuid::Uuid;

/// One entry on a queue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Queue-assigned id.
    pub id: String,
    /// Entry body, as enqueued.
    pub body: String,
    /// Enqueue time.
    pub enqueued_at: DateTime<Utc>,
}

/// Named queues of visible entries.
#[derive(Default)]
pub struct InMemoryQueueStore {
    queues: RwLock<BTreeMap<String, VecDeque<QueueEntry>>>,
}

impl InMemoryQueueStore {
    /// Create a store with no queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the visible entries, oldest first.
    pub fn entries(&self, queue: &str) -> Result<Vec<QueueEntry>, QueueError> {
        self.queues
            .read()
            .get(queue)
            .map(|entries| entries.iter().cloned().collect())
            .ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))
    }

    /// Take up to `max` entries off the front of a queue.
    pub fn receive_messages(&self, queue: &str, max: usize) -> Result<Vec<QueueEntry>, QueueError> {
        let mut queues = self.queues.write();
        let entries = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))?;
        let take = max.min(entries.len());
        Ok(entries.drain(..take).collect())
    }

    /// Queue names, sorted.
    pub fn queue_names(&self) -> Vec<String> {
        self.queues.read().keys().cloned().collect()
    }

    /// Remove a queue and its entries.
    pub fn delete_queue(&self, queue: &str) -> Result<(), QueueError> {
        self.queues
            .write()
            .remove(queue)
            .map(|_| ())
            .ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))
    }

    /// Remove every queue.
    pub fn clear(&self) {
        self.queues.write().clear();
    }
}

impl QueueStore for InMemoryQueueStore {
    fn create_queue(&self, name: &str) -> Result<(), QueueError> {
        if !is_resource_name(name, MAX_QUEUE_NAME_LEN) {
            return Err(QueueError::InvalidQueueName(name.to_string()));
        }

        let mut queues = self.queues.write();
        if queues.contains_key(name) {
            return Err(QueueError::DuplicateQueue(name.to_string()));
        }
        queues.insert(name.to_string(), VecDeque::new());

        debug!(queue = name, "Queue created");
        Ok(())
    }

    fn enqueue(&self, queue: &str, body: String) -> Result<(), QueueError> {
        let mut queues = self.queues.write();
        let entries = queues
            .get_mut(queue)
            .ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))?;
        entries.push_back(QueueEntry {
            id: Uuid::new_v4().to_string(),
            body,
            enqueued_at: Utc::now(),
        });
        Ok(())
    }

    fn visible_messages(&self, queue: &str) -> Result<usize, QueueError> {
        self.queues
            .read()
            .get(queue)
            .map(VecDeque::len)
            .ok_or_else(|| QueueError::QueueNotFound(queue.to_string()))
    }
}
