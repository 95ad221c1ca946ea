//! Application services.

pub mod drain;

pub use drain::{DeliveryOutcome, DeliveryRecord, DrainCoordinator, DrainReport, DrainScope};
