//! Core types for the Zendesk bridge.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod dates;
pub mod email;
pub mod id;
pub mod money;

pub use dates::format_store_datetime;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::CurrencyCode;
