//! # Domain Entities
//!
//! Topics, subscriptions, delivery targets and messages.

use super::errors::SnsError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum topic name length.
pub const MAX_TOPIC_NAME_LEN: usize = 256;

/// Maximum queue name length.
pub const MAX_QUEUE_NAME_LEN: usize = 80;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an already formatted identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// ARN-like topic identifier.
    TopicArn
);
string_id!(
    /// ARN-like subscription identifier.
    SubscriptionArn
);
string_id!(
    /// Unique message identifier.
    MessageId
);

/// A named publish/subscribe channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Name the topic was created with.
    pub name: String,
    /// Generated identifier.
    pub arn: TopicArn,
}

/// Validate a topic name: 1-256 characters of `[A-Za-z0-9_-]`.
pub fn validate_topic_name(name: &str) -> Result<(), SnsError> {
    if is_resource_name(name, MAX_TOPIC_NAME_LEN) {
        Ok(())
    } else {
        Err(SnsError::InvalidTopicName(name.to_string()))
    }
}

pub(crate) fn is_resource_name(name: &str, max_len: usize) -> bool {
    !name.is_empty()
        && name.len() <= max_len
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Subscription protocols understood by the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Queue-backed subscriber.
    Sqs,
    /// Plain HTTP callback.
    Http,
    /// HTTPS callback.
    Https,
}

impl Protocol {
    /// Protocol string as used on the SNS API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqs => "sqs",
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqs" => Ok(Self::Sqs),
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(SnsError::UnsupportedProtocol(s.to_string())),
        }
    }
}

/// Reference to a queue in the queue store, resolved to its name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueRef(String);

impl QueueRef {
    /// Parse a queue name or an `arn:aws:sqs:<region>:<account>:<name>` ARN.
    pub fn parse(endpoint: &str) -> Result<Self, SnsError> {
        let name = if endpoint.starts_with("arn:") {
            let parts: Vec<&str> = endpoint.split(':').collect();
            match parts.as_slice() {
                ["arn", _, "sqs", _, _, name] => *name,
                _ => {
                    return Err(SnsError::InvalidTarget {
                        endpoint: endpoint.to_string(),
                        reason: "not an SQS queue ARN".to_string(),
                    })
                }
            }
        } else {
            endpoint
        };

        if !is_resource_name(name, MAX_QUEUE_NAME_LEN) {
            return Err(SnsError::InvalidTarget {
                endpoint: endpoint.to_string(),
                reason: "queue names are 1-80 characters of [A-Za-z0-9_-]".to_string(),
            });
        }

        Ok(Self(name.to_string()))
    }

    /// Queue name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Absolute `http`/`https` callback URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HttpEndpoint(String);

impl HttpEndpoint {
    /// Parse and validate a callback URL.
    pub fn parse(endpoint: &str) -> Result<Self, SnsError> {
        let invalid = |reason: &str| SnsError::InvalidTarget {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        };

        let url = reqwest::Url::parse(endpoint).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }

        Ok(Self(endpoint.to_string()))
    }

    /// The URL as supplied.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the URL uses TLS.
    pub fn is_https(&self) -> bool {
        self.0.starts_with("https:")
    }
}

impl fmt::Display for HttpEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination of a subscription.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "protocol", content = "endpoint", rename_all = "lowercase")]
pub enum Target {
    /// Entries are appended to a queue.
    Queue(QueueRef),
    /// Entries are POSTed to a URL.
    Http(HttpEndpoint),
}

impl Target {
    /// Build a target from an SNS-style protocol/endpoint pair.
    pub fn from_protocol(protocol: Protocol, endpoint: &str) -> Result<Self, SnsError> {
        match protocol {
            Protocol::Sqs => Ok(Self::Queue(QueueRef::parse(endpoint)?)),
            Protocol::Http | Protocol::Https => {
                let http = HttpEndpoint::parse(endpoint)?;
                if http.is_https() != (protocol == Protocol::Https) {
                    return Err(SnsError::InvalidTarget {
                        endpoint: endpoint.to_string(),
                        reason: format!("endpoint scheme does not match protocol {protocol}"),
                    });
                }
                Ok(Self::Http(http))
            }
        }
    }

    /// Protocol this target is delivered over.
    pub fn protocol(&self) -> Protocol {
        match self {
            Self::Queue(_) => Protocol::Sqs,
            Self::Http(endpoint) if endpoint.is_https() => Protocol::Https,
            Self::Http(_) => Protocol::Http,
        }
    }

    /// Endpoint string as it would appear on the SNS API.
    pub fn endpoint(&self) -> &str {
        match self {
            Self::Queue(queue) => queue.name(),
            Self::Http(endpoint) => endpoint.as_str(),
        }
    }
}

/// `http://` and `https://` strings become HTTP targets, anything else a queue.
impl FromStr for Target {
    type Err = SnsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Self::Http(HttpEndpoint::parse(s)?))
        } else {
            Ok(Self::Queue(QueueRef::parse(s)?))
        }
    }
}

/// A registered delivery target attached to a topic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Generated identifier.
    pub arn: SubscriptionArn,
    /// Owning topic.
    pub topic_arn: TopicArn,
    /// Where notifications go.
    pub target: Target,
}

/// A published message awaiting drain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier returned by publish.
    pub id: MessageId,
    /// Topic the message was published to.
    pub topic_arn: TopicArn,
    /// Payload, delivered verbatim.
    pub body: String,
    /// Optional subject supplied at publish.
    pub subject: Option<String>,
    /// Publish time.
    pub published_at: DateTime<Utc>,
}
