//! Ports layer.
//!
//! - Inbound (driving): `NotificationApi`, the API exposed to callers
//! - Outbound (driven): queue store, HTTP transport, ids and time

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
