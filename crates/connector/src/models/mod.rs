//! Typed records for the store read model.
//!
//! The connector does not own the schema it reads; these structs give the
//! rows it consumes explicit types instead of stringly-typed access. They
//! are populated by the repositories in [`crate::db`] and shaped into
//! response documents by [`crate::services::report`].

pub mod customer;
pub mod order;

pub use customer::{CustomerRecord, CustomerSnapshot};
pub use order::{AddressKind, ItemStatus, OrderAddressRecord, OrderItemRecord, OrderRecord};
