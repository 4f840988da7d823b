//! Integration tests for the Zendesk bridge.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a PostgreSQL database holding the store read model and seed it,
//! # then run the connector:
//! BRIDGE_API_ENABLED=true BRIDGE_API_TOKEN=abc123 \
//!     cargo run -p zendesk-bridge-connector
//!
//! # Run the ignored integration tests against it:
//! cargo test -p zendesk-bridge-integration-tests -- --ignored
//! ```
//!
//! The tests are `#[ignore]`d by default because they need a running
//! connector and a seeded database. Connection details come from the
//! environment (see the helpers below).

/// Base URL of the running connector (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BRIDGE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// The API token the connector under test was started with.
#[must_use]
pub fn api_token() -> String {
    std::env::var("BRIDGE_API_TOKEN").unwrap_or_else(|_| "abc123".to_string())
}

/// A seeded email address with a registered customer and at least two orders.
#[must_use]
pub fn seeded_email() -> String {
    std::env::var("BRIDGE_SEEDED_EMAIL").unwrap_or_else(|_| "jane@example.com".to_string())
}
