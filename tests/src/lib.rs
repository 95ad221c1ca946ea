//! # Fake SNS Test Suite
//!
//! Cross-crate flows against real collaborators: the in-memory queue store,
//! an axum HTTP receiver on an ephemeral port, and the admin router driven
//! over `reqwest`.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Contexts, HTTP receiver, queue readers
//! └── integration/
//!     ├── drain_flows.rs    # Idempotence, isolation, single-message drain
//!     ├── http_delivery.rs  # Envelope + headers on the wire, failing endpoints
//!     └── admin_api.rs      # Control API end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p fake-sns-tests
//! cargo test -p fake-sns-tests integration::http_delivery
//! ```

pub mod integration;
pub mod support;
