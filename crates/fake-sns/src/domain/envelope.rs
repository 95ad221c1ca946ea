//! # Notification Envelope
//!
//! The payload handed to a subscriber for one (message, subscription) pair.
//!
//! ## Wire Contract
//!
//! | Key | Value |
//! |-----|-------|
//! | `Type` | `"Notification"` |
//! | `Message` | message body, verbatim |
//! | `MessageId` | message id |
//! | `Signature` | `"Fake"` (nothing is ever signed) |
//! | `SignatureVersion` | `"1"` |
//! | `SigningCertURL` | [`SIGNING_CERT_URL`] |
//! | `Subject` | `null` unless supplied at publish |
//! | `Timestamp` | ISO-8601 UTC, taken at render time |
//! | `TopicArn` | topic ARN |
//! | `UnsubscribeURL` | `""` |

use super::entities::{Message, Subscription, SubscriptionArn, TopicArn};
use crate::ports::outbound::TimeSource;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Notification type tag.
pub const NOTIFICATION_TYPE: &str = "Notification";

/// Signature placeholder.
pub const FAKE_SIGNATURE: &str = "Fake";

/// Signature version.
pub const SIGNATURE_VERSION: &str = "1";

/// Placeholder signing certificate.
pub const SIGNING_CERT_URL: &str = concat!(
    "https://sns.us-east-1.amazonaws.com/",
    "SimpleNotificationService-f3ecfb7224c7233fe7bb5f59f96de52f.pem"
);

/// Unsubscribing is not simulated.
pub const UNSUBSCRIBE_URL: &str = "";

/// Rendered notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "Type")]
    pub notification_type: String,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "MessageId")]
    pub message_id: String,
    #[serde(rename = "Signature")]
    pub signature: String,
    #[serde(rename = "SignatureVersion")]
    pub signature_version: String,
    #[serde(rename = "SigningCertURL")]
    pub signing_cert_url: String,
    #[serde(rename = "Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "TopicArn")]
    pub topic_arn: String,
    #[serde(rename = "UnsubscribeURL")]
    pub unsubscribe_url: String,

    /// Recipient; carried for transport headers, not part of the body.
    #[serde(skip)]
    pub subscription_arn: Option<SubscriptionArn>,
}

impl Envelope {
    /// Flat JSON text of the notification fields.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Format a timestamp the way SNS does: `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders envelopes; the only impurity is the clock.
#[derive(Clone)]
pub struct EnvelopeRenderer {
    clock: Arc<dyn TimeSource>,
}

impl EnvelopeRenderer {
    /// Create a renderer reading time from `clock`.
    pub fn new(clock: Arc<dyn TimeSource>) -> Self {
        Self { clock }
    }

    /// Render the notification for one subscriber.
    pub fn render(
        &self,
        topic: &TopicArn,
        message: &Message,
        subscription: &Subscription,
    ) -> Envelope {
        Envelope {
            notification_type: NOTIFICATION_TYPE.to_string(),
            message: message.body.clone(),
            message_id: message.id.to_string(),
            signature: FAKE_SIGNATURE.to_string(),
            signature_version: SIGNATURE_VERSION.to_string(),
            signing_cert_url: SIGNING_CERT_URL.to_string(),
            subject: message.subject.clone(),
            timestamp: format_timestamp(self.clock.now()),
            topic_arn: topic.to_string(),
            unsubscribe_url: UNSUBSCRIBE_URL.to_string(),
            subscription_arn: Some(subscription.arn.clone()),
        }
    }
}
