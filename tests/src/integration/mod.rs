//! Integration flows.

pub mod drain_flows;
pub mod http_delivery;
