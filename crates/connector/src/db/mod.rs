//! Read-only database access to the store's `PostgreSQL` read model.
//!
//! The connector does not own this schema and never writes to it. Queries
//! are plain runtime queries (`query_as`/`query_scalar`) rather than
//! compile-time checked macros, since the tables belong to an external
//! system.
//!
//! ## Tables consumed
//!
//! - `customer` - Registered customer accounts
//! - `customer_group` - Group labels
//! - `sales_order` - Order headers (with denormalized customer snapshot)
//! - `sales_order_address` - Billing/shipping addresses per order
//! - `sales_order_item` - Line items (composite children carry `parent_item_id`)
//! - `sales_order_payment` - Payment rows (`additional_information` JSON)
//! - `store` / `store_website` - Store to website-name resolution

pub mod customers;
pub mod groups;
pub mod orders;
pub mod stores;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use groups::GroupRepository;
pub use orders::OrderRepository;
pub use stores::StoreRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
