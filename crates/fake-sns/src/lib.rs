//! # Fake SNS
//!
//! In-process simulation of a publish/subscribe notification service for
//! test suites. Topics accept published messages and fan them out, only when
//! a drain is requested, to queue-backed and HTTP-callback subscribers.
//!
//! ## Delivery Guarantees
//!
//! | Guarantee | Enforcement Location |
//! |-----------|---------------------|
//! | One delivery per (message, subscription) | `service/drain.rs` - commit removes it |
//! | Topics never leak into each other | `domain/message_store.rs` - per-topic index |
//! | A failing subscriber never blocks siblings | `service/drain.rs` - `join_all` |
//! | Overlapping drains never duplicate | `service/drain.rs` - per-topic async mutex |
//! | A dropped drain caller never duplicates | `service/drain.rs` - spawned topic passes |
//!
//! ## Message Lifecycle
//!
//! ```text
//! publish ──→ [PENDING] ──drain──→ [DELIVERING] ──commit──→ [GONE]
//!                                       │
//!                                       └── failures logged, still committed
//! ```
//!
//! Subscriptions are looked up when the drain runs, so a subscriber added
//! between publish and drain still receives the message. A subscriber added
//! after the drain does not.
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - queue + HTTP delivery, in-memory queues, reqwest   │
//! │  context.rs - SnsContext wiring, reset                          │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - NotificationApi trait                      │
//! │  ports/outbound.rs - QueueStore, HttpTransport, TimeSource      │
//! │  service/drain.rs  - DrainCoordinator                           │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/entities.rs      - Topic, Subscription, Target, Message │
//! │  domain/registry.rs      - SubscriptionRegistry                 │
//! │  domain/message_store.rs - MessageStore (arena + index)         │
//! │  domain/envelope.rs      - Envelope, EnvelopeRenderer           │
//! │  domain/errors.rs        - SnsError, QueueError, DeliveryError  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fake_sns::{NotificationApi, SnsConfig, SnsContext};
//!
//! let sns = SnsContext::new(SnsConfig::default())?;
//! let topic = sns.create_topic("orders").await?;
//! sns.create_queue("orders-queue")?;
//! sns.subscribe(&topic.arn, "orders-queue".parse()?).await?;
//!
//! sns.publish(&topic.arn, "hello").await?;
//! sns.drain(None).await;
//!
//! assert_eq!(sns.queues().entries("orders-queue")?.len(), 1);
//! ```

pub mod adapters;
pub mod config;
pub mod context;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use config::SnsConfig;
pub use context::{ContextSummary, SnsContext};
pub use domain::*;
pub use ports::*;
pub use service::*;

/// Crate version, reported by the admin server.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
