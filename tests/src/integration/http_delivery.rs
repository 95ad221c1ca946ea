//! # HTTP Delivery
//!
//! Notifications POSTed to a real axum receiver: body contract, identifying
//! headers, and behavior when an endpoint is down or answers with an error.

#[cfg(test)]
mod tests {
    use crate::support::{closed_address, context, queue_bodies, HttpReceiver};
    use axum::http::StatusCode;
    use chrono::DateTime;
    use fake_sns::{
        NotificationApi, Protocol, Target, FAKE_SIGNATURE, HEADER_MESSAGE_ID,
        HEADER_MESSAGE_TYPE, HEADER_SUBSCRIPTION_ARN, HEADER_TOPIC_ARN, SIGNATURE_VERSION,
        SIGNING_CERT_URL,
    };
    use serde_json::Value;

    #[tokio::test]
    async fn test_http_subscriber_receives_one_post() {
        let ctx = context();
        let endpoint = HttpReceiver::start().await;
        let topic = ctx.create_topic("T").await.unwrap();
        let subscription = ctx
            .subscribe(&topic.arn, endpoint.url("/endpoint").parse().unwrap())
            .await
            .unwrap();

        let m1 = ctx.publish(&topic.arn, "X").await.unwrap();
        ctx.drain(None).await;

        let received = endpoint.received();
        assert_eq!(received.len(), 1);
        let request = &received[0];
        assert_eq!(request.path, "/endpoint");
        assert_eq!(request.json()["MessageId"], m1.as_str());
        assert_eq!(
            request.header("X-Amz-Sns-Subscription-Arn"),
            Some(subscription.arn.as_str())
        );

        // Drained: nothing more is posted
        ctx.drain(None).await;
        assert_eq!(endpoint.received().len(), 1);
    }

    #[tokio::test]
    async fn test_envelope_contract_on_the_wire() {
        let ctx = context();
        let endpoint = HttpReceiver::start().await;
        let topic = ctx.create_topic("contract").await.unwrap();
        let subscription = ctx
            .subscribe(&topic.arn, endpoint.url("/hook").parse().unwrap())
            .await
            .unwrap();
        let id = ctx.publish(&topic.arn, "{\"nested\":true}").await.unwrap();
        ctx.drain(Some(id.clone())).await;

        let request = &endpoint.received()[0];
        let body = request.json();
        let object = body.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "Message",
                "MessageId",
                "Signature",
                "SignatureVersion",
                "SigningCertURL",
                "Subject",
                "Timestamp",
                "TopicArn",
                "Type",
                "UnsubscribeURL",
            ]
        );

        assert_eq!(body["Type"], "Notification");
        assert_eq!(body["Message"], "{\"nested\":true}");
        assert_eq!(body["MessageId"], id.as_str());
        assert_eq!(body["Signature"], FAKE_SIGNATURE);
        assert_eq!(body["SignatureVersion"], SIGNATURE_VERSION);
        assert_eq!(body["SigningCertURL"], SIGNING_CERT_URL);
        assert_eq!(body["Subject"], Value::Null);
        assert_eq!(body["TopicArn"], topic.arn.as_str());
        assert_eq!(body["UnsubscribeURL"], "");

        let timestamp = body["Timestamp"].as_str().unwrap();
        assert!(timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());

        assert_eq!(request.header(HEADER_MESSAGE_TYPE), Some("Notification"));
        assert_eq!(request.header(HEADER_MESSAGE_ID), Some(id.as_str()));
        assert_eq!(request.header(HEADER_TOPIC_ARN), Some(topic.arn.as_str()));
        assert_eq!(
            request.header(HEADER_SUBSCRIPTION_ARN),
            Some(subscription.arn.as_str())
        );
        assert_eq!(
            request.header("content-type"),
            Some("text/plain; charset=UTF-8")
        );
    }

    #[tokio::test]
    async fn test_subject_only_when_supplied() {
        let ctx = context();
        let endpoint = HttpReceiver::start().await;
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.subscribe(&topic.arn, endpoint.url("/").parse().unwrap())
            .await
            .unwrap();

        ctx.publish_with_subject(&topic.arn, "with", Some("Hello".to_string()))
            .await
            .unwrap();
        ctx.publish(&topic.arn, "without").await.unwrap();
        ctx.drain(None).await;

        let subjects: Vec<Value> = endpoint
            .received()
            .iter()
            .map(|request| request.json()["Subject"].clone())
            .collect();
        assert_eq!(subjects, vec![Value::from("Hello"), Value::Null]);
    }

    #[tokio::test]
    async fn test_failing_endpoints_do_not_block_siblings() {
        let ctx = context();
        let healthy = HttpReceiver::start().await;
        let broken = HttpReceiver::with_status(StatusCode::INTERNAL_SERVER_ERROR).await;
        let unreachable = format!("http://{}/gone", closed_address());

        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        for endpoint in [
            unreachable.clone(),
            broken.url("/fail"),
            healthy.url("/ok"),
            "Q".to_string(),
        ] {
            ctx.subscribe(&topic.arn, endpoint.parse().unwrap())
                .await
                .unwrap();
        }

        let id = ctx.publish(&topic.arn, "X").await.unwrap();
        let report = ctx.drain(None).await;

        assert_eq!(report.drained, vec![id]);
        assert_eq!(report.deliveries.len(), 4);
        assert_eq!(report.delivered_count(), 2);
        assert_eq!(report.failed_count(), 2);

        assert_eq!(healthy.received().len(), 1);
        assert_eq!(broken.received().len(), 1);
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X"]);

        // Failures are not retried by a later drain
        assert!(ctx.drain(None).await.is_empty());
        assert_eq!(broken.received().len(), 1);
    }

    #[tokio::test]
    async fn test_protocol_must_match_scheme() {
        let ctx = context();
        let endpoint = HttpReceiver::start().await;
        let url = endpoint.url("/hook");

        assert!(Target::from_protocol(Protocol::Http, &url).is_ok());
        assert!(Target::from_protocol(Protocol::Https, &url).is_err());

        let topic = ctx.create_topic("T").await.unwrap();
        let subscription = ctx
            .subscribe(&topic.arn, Target::from_protocol(Protocol::Http, &url).unwrap())
            .await
            .unwrap();
        assert_eq!(subscription.target.protocol(), Protocol::Http);
        assert_eq!(subscription.target.endpoint(), url);
    }
}
