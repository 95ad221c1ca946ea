//! # Drain Flows
//!
//! Publish/drain sequences against the real in-memory queue store.
//!
//! 1. Single-message drain, then full drain, then a repeated drain
//! 2. Topic isolation
//! 3. Zero-subscriber topics
//! 4. Late subscribers and overlapping drains
//! 5. Publishing while a drain of the same topic is in flight

#[cfg(test)]
mod tests {
    use crate::support::{context, queue_bodies, HttpReceiver};
    use fake_sns::{MessageId, NotificationApi};
    use futures::future::join_all;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_single_message_then_full_drain_scenario() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();

        let m1 = ctx.publish(&topic.arn, "X").await.unwrap();
        let m2 = ctx.publish(&topic.arn, "Y").await.unwrap();
        assert_ne!(m1, m2);

        ctx.drain(Some(m1)).await;
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X"]);

        ctx.drain(None).await;
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X", "Y"]);

        let report = ctx.drain(None).await;
        assert!(report.is_empty());
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X", "Y"]);
    }

    #[tokio::test]
    async fn test_one_entry_per_subscription_per_message() {
        let ctx = context();
        let topic = ctx.create_topic("fanout").await.unwrap();
        for queue in ["a", "b", "c"] {
            ctx.create_queue(queue).unwrap();
            ctx.subscribe(&topic.arn, queue.parse().unwrap())
                .await
                .unwrap();
        }
        for body in ["1", "2", "3", "4"] {
            ctx.publish(&topic.arn, body).await.unwrap();
        }

        for _ in 0..3 {
            ctx.drain(None).await;
        }

        for queue in ["a", "b", "c"] {
            assert_eq!(queue_bodies(&ctx, queue), vec!["1", "2", "3", "4"]);
        }
    }

    #[tokio::test]
    async fn test_identical_bodies_are_distinct_messages() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();

        ctx.publish(&topic.arn, "same").await.unwrap();
        ctx.publish(&topic.arn, "same").await.unwrap();
        ctx.drain(None).await;

        assert_eq!(queue_bodies(&ctx, "Q"), vec!["same", "same"]);
    }

    #[tokio::test]
    async fn test_topics_do_not_leak() {
        let ctx = context();
        let a = ctx.create_topic("A").await.unwrap();
        let b = ctx.create_topic("B").await.unwrap();
        ctx.create_queue("qa").unwrap();
        ctx.create_queue("qb").unwrap();
        ctx.subscribe(&a.arn, "qa".parse().unwrap()).await.unwrap();
        ctx.subscribe(&b.arn, "qb".parse().unwrap()).await.unwrap();

        ctx.publish(&a.arn, "for-a").await.unwrap();
        ctx.drain(None).await;

        assert_eq!(queue_bodies(&ctx, "qa"), vec!["for-a"]);
        assert!(queue_bodies(&ctx, "qb").is_empty());
    }

    #[tokio::test]
    async fn test_single_drain_leaves_siblings_pending() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();

        let ids: Vec<MessageId> = {
            let mut ids = Vec::new();
            for body in ["1", "2", "3"] {
                ids.push(ctx.publish(&topic.arn, body).await.unwrap());
            }
            ids
        };

        ctx.drain(Some(ids[1].clone())).await;
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["2"]);
        assert_eq!(ctx.store().len(), 2);

        // Draining the same id again is a no-op
        assert!(ctx.drain(Some(ids[1].clone())).await.is_empty());

        ctx.drain(None).await;
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["2", "1", "3"]);
    }

    #[tokio::test]
    async fn test_zero_subscribers_consumes_without_delivery() {
        let ctx = context();
        let topic = ctx.create_topic("nobody-listens").await.unwrap();
        let id = ctx.publish(&topic.arn, "X").await.unwrap();

        let report = ctx.drain(None).await;
        assert_eq!(report.drained, vec![id]);
        assert!(report.deliveries.is_empty());
        assert!(ctx.store().is_empty());

        // A subscriber added afterwards never sees it
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();
        ctx.drain(None).await;
        assert!(queue_bodies(&ctx, "Q").is_empty());
    }

    #[tokio::test]
    async fn test_subscriber_added_before_drain_receives_pending() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.publish(&topic.arn, "early").await.unwrap();

        ctx.create_queue("late").unwrap();
        let arn = ctx.queue_arn("late");
        ctx.subscribe(&topic.arn, arn.parse().unwrap()).await.unwrap();
        ctx.drain(None).await;

        assert_eq!(queue_bodies(&ctx, "late"), vec!["early"]);
    }

    #[tokio::test]
    async fn test_missing_queue_does_not_keep_message_pending() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("present").unwrap();
        ctx.subscribe(&topic.arn, "deleted-later".parse().unwrap())
            .await
            .unwrap();
        ctx.subscribe(&topic.arn, "present".parse().unwrap())
            .await
            .unwrap();
        ctx.publish(&topic.arn, "X").await.unwrap();

        let report = ctx.drain(None).await;
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.delivered_count(), 1);
        assert!(ctx.store().is_empty());
        assert_eq!(queue_bodies(&ctx, "present"), vec!["X"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_overlapping_drains_deliver_once() {
        let ctx = Arc::new(context());
        let mut topics = Vec::new();
        for name in ["t1", "t2", "t3"] {
            let topic = ctx.create_topic(name).await.unwrap();
            let queue = format!("{name}-q");
            ctx.create_queue(&queue).unwrap();
            ctx.subscribe(&topic.arn, queue.parse().unwrap())
                .await
                .unwrap();
            for i in 0..25 {
                ctx.publish(&topic.arn, &format!("{name}-{i}")).await.unwrap();
            }
            topics.push(queue);
        }

        let drains = (0..8).map(|_| {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.drain(None).await })
        });
        let total: usize = join_all(drains)
            .await
            .into_iter()
            .map(|report| report.unwrap().drained.len())
            .sum();

        assert_eq!(total, 75);
        for queue in &topics {
            assert_eq!(queue_bodies(&ctx, queue).len(), 25);
        }
    }

    #[tokio::test]
    async fn test_reset_isolates_runs() {
        let ctx = context();
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.publish(&topic.arn, "stale").await.unwrap();

        ctx.reset();

        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();
        ctx.publish(&topic.arn, "fresh").await.unwrap();
        ctx.drain(None).await;

        assert_eq!(queue_bodies(&ctx, "Q"), vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_publish_during_drain_waits_for_next_drain() {
        let receiver = HttpReceiver::slow(Duration::from_millis(300)).await;
        let ctx = Arc::new(context());
        let topic = ctx.create_topic("T").await.unwrap();
        ctx.create_queue("Q").unwrap();
        ctx.subscribe(&topic.arn, "Q".parse().unwrap()).await.unwrap();
        ctx.subscribe(&topic.arn, receiver.url("/hook").parse().unwrap())
            .await
            .unwrap();

        let x = ctx.publish(&topic.arn, "X").await.unwrap();
        let in_flight = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.drain(None).await })
        };

        // Published while the drain above is blocked on the slow receiver
        tokio::time::sleep(Duration::from_millis(100)).await;
        let y = ctx.publish(&topic.arn, "Y").await.unwrap();

        let report = in_flight.await.unwrap();
        assert_eq!(report.drained, vec![x]);
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X"]);
        assert_eq!(ctx.store().len(), 1);

        let next = ctx.drain(None).await;
        assert_eq!(next.drained, vec![y]);
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X", "Y"]);
        assert_eq!(receiver.received().len(), 2);

        assert!(ctx.drain(None).await.is_empty());
        assert_eq!(queue_bodies(&ctx, "Q"), vec!["X", "Y"]);
    }
}
