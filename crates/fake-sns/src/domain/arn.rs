//! ARN formatting for topics, subscriptions and queues.
//!
//! Purely cosmetic: nothing in the dispatch path parses these back.

use super::entities::{SubscriptionArn, TopicArn};
use serde::{Deserialize, Serialize};

/// Region/account context used to build ARNs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArnFormatter {
    /// AWS region, e.g. `us-east-1`.
    pub region: String,
    /// 12-digit account id.
    pub account_id: String,
}

impl ArnFormatter {
    /// Create a formatter for a region/account pair.
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account_id: account_id.into(),
        }
    }

    /// `arn:aws:sns:<region>:<account>:<name>`
    pub fn topic_arn(&self, name: &str) -> TopicArn {
        TopicArn::new(format!(
            "arn:aws:sns:{}:{}:{}",
            self.region, self.account_id, name
        ))
    }

    /// `<topic-arn>:<id>`
    pub fn subscription_arn(&self, topic: &TopicArn, id: &str) -> SubscriptionArn {
        SubscriptionArn::new(format!("{topic}:{id}"))
    }

    /// `arn:aws:sqs:<region>:<account>:<name>`
    pub fn queue_arn(&self, name: &str) -> String {
        format!("arn:aws:sqs:{}:{}:{}", self.region, self.account_id, name)
    }
}
