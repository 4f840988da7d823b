//! Zendesk Bridge Core - Shared types library.
//!
//! This crate provides common types used across the bridge components:
//! - `connector` - The HTTP service consumed by the support platform
//! - `integration-tests` - End-to-end test harness
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, money, and dates
//!
//! # Features
//!
//! - `postgres` - sqlx `Type`/`Encode`/`Decode` impls for the newtypes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
