//! HTTP route handlers for the connector.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB connectivity)
//!
//! # Support platform API (bearer token required)
//! GET  /v1/customer-orders     - Customer identity + recent order history
//! POST /v1/customer-orders     - Same, with the parameter in the form body
//! ```

pub mod customer;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the support-platform API router.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/customer-orders",
        get(customer::report_get).post(customer::report_post),
    )
}
