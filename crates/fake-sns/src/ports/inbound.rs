//! # Inbound Port - NotificationApi
//!
//! Driving port exposing the simulated notification service to test code
//! and the admin server.
//!
//! | Method | Effect |
//! |--------|--------|
//! | `create_topic` | Register a topic by name |
//! | `subscribe` | Attach a queue or HTTP target to a topic |
//! | `publish` | Append a pending message; nothing is delivered yet |
//! | `drain` | Deliver pending messages, once per subscription |

use crate::domain::{MessageId, SnsError, Subscription, Target, Topic, TopicArn};
use crate::service::DrainReport;
use async_trait::async_trait;

/// Primary API of the simulator.
///
/// # Example
///
/// ```rust,ignore
/// use fake_sns::ports::NotificationApi;
///
/// async fn example(sns: &impl NotificationApi) {
///     let topic = sns.create_topic("orders").await?;
///     sns.subscribe(&topic.arn, "orders-queue".parse()?).await?;
///     let id = sns.publish(&topic.arn, "hello").await?;
///
///     // Only now does "orders-queue" receive the notification
///     sns.drain(Some(id)).await;
/// }
/// ```
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Creates a topic.
    ///
    /// # Errors
    /// - `DuplicateTopic`: a topic with this name exists
    /// - `InvalidTopicName`: empty, too long or bad characters
    async fn create_topic(&self, name: &str) -> Result<Topic, SnsError>;

    /// Subscribes `target` to `topic`.
    ///
    /// The subscription receives every message still pending at the next
    /// drain, including ones published before it was created.
    ///
    /// # Errors
    /// - `TopicNotFound`
    async fn subscribe(&self, topic: &TopicArn, target: Target) -> Result<Subscription, SnsError>;

    /// Publishes `body` to `topic` with no subject.
    ///
    /// # Errors
    /// - `TopicNotFound`
    async fn publish(&self, topic: &TopicArn, body: &str) -> Result<MessageId, SnsError> {
        self.publish_with_subject(topic, body, None).await
    }

    /// Publishes `body` to `topic` with an optional subject line.
    async fn publish_with_subject(
        &self,
        topic: &TopicArn,
        body: &str,
        subject: Option<String>,
    ) -> Result<MessageId, SnsError>;

    /// Delivers pending messages: one message if `message_id` is given,
    /// otherwise everything pending. Delivery failures are reported, not
    /// returned.
    async fn drain(&self, message_id: Option<MessageId>) -> DrainReport;
}
