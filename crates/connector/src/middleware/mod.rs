//! HTTP middleware for the connector.
//!
//! The only middleware concern the connector owns is the bearer-token
//! authorization gate in [`auth`]; request tracing and error capture are
//! handled by `TraceLayer` and the Sentry layers installed in `main`.

pub mod auth;

pub use auth::{AuthError, AuthGrant, RequireApiAuth, authorize};
