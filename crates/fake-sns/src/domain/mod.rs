//! # Domain Layer
//!
//! Pure bookkeeping for the notification service.
//!
//! ## Components
//!
//! - `entities`: Topic, Subscription, Target, Message and their identifiers
//! - `registry`: SubscriptionRegistry, topics and ordered subscriber lists
//! - `message_store`: MessageStore, pending messages per topic (arena + index)
//! - `envelope`: Envelope and EnvelopeRenderer, the notification wire shape
//! - `arn`: ArnFormatter
//! - `errors`: SnsError, QueueError, DeliveryError

pub mod arn;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod message_store;
pub mod registry;

pub use arn::*;
pub use entities::*;
pub use envelope::*;
pub use errors::*;
pub use message_store::*;
pub use registry::*;
