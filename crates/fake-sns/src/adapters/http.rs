//! HTTP delivery adapter.
//!
//! One POST per (message, subscription), carrying the envelope JSON and the
//! `x-amz-sns-*` identification headers. Failures are reported, never retried.

use super::DeliveryAdapter;
use crate::domain::{DeliveryError, Envelope, HttpEndpoint, NOTIFICATION_TYPE};
use crate::ports::outbound::{HttpRequest, HttpTransport};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Header carrying the notification type.
pub const HEADER_MESSAGE_TYPE: &str = "x-amz-sns-message-type";
/// Header carrying the message id.
pub const HEADER_MESSAGE_ID: &str = "x-amz-sns-message-id";
/// Header carrying the topic ARN.
pub const HEADER_TOPIC_ARN: &str = "x-amz-sns-topic-arn";
/// Header carrying the subscription ARN.
pub const HEADER_SUBSCRIPTION_ARN: &str = "x-amz-sns-subscription-arn";

/// SNS posts notifications as text.
pub const NOTIFICATION_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

/// Delivers envelopes to HTTP callbacks.
pub struct HttpDeliveryAdapter {
    transport: Arc<dyn HttpTransport>,
}

impl HttpDeliveryAdapter {
    /// Create an adapter posting through `transport`.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Build the request for one envelope.
    pub fn build_request(
        envelope: &Envelope,
        target: &HttpEndpoint,
    ) -> Result<HttpRequest, DeliveryError> {
        let subscription_arn = envelope
            .subscription_arn
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();

        Ok(HttpRequest {
            url: target.to_string(),
            headers: vec![
                ("content-type".to_string(), NOTIFICATION_CONTENT_TYPE.to_string()),
                (HEADER_MESSAGE_TYPE.to_string(), NOTIFICATION_TYPE.to_string()),
                (HEADER_MESSAGE_ID.to_string(), envelope.message_id.clone()),
                (HEADER_TOPIC_ARN.to_string(), envelope.topic_arn.clone()),
                (HEADER_SUBSCRIPTION_ARN.to_string(), subscription_arn),
            ],
            body: envelope.to_json()?,
        })
    }
}

#[async_trait]
impl DeliveryAdapter<HttpEndpoint> for HttpDeliveryAdapter {
    async fn deliver(
        &self,
        envelope: &Envelope,
        target: &HttpEndpoint,
    ) -> Result<(), DeliveryError> {
        let request = Self::build_request(envelope, target)?;
        let status = self.transport.post(request).await?;

        if !(200..300).contains(&status) {
            return Err(DeliveryError::Status(status));
        }

        debug!(
            endpoint = %target,
            message_id = %envelope.message_id,
            status,
            "Notification posted"
        );
        Ok(())
    }
}

/// `HttpTransport` on a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the given timeouts.
    pub fn new(
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<u16, DeliveryError> {
        let mut builder = self.client.post(&request.url).body(request.body);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                DeliveryError::Transport(format!("cannot connect to {}", request.url))
            } else if e.is_timeout() {
                DeliveryError::Transport(format!("timed out posting to {}", request.url))
            } else {
                DeliveryError::Transport(e.to_string())
            }
        })?;

        Ok(response.status().as_u16())
    }
}
