//! Customer rows from the store read model.

use chrono::{DateTime, Utc};

use zendesk_bridge_core::{CustomerId, GroupId};

/// A registered customer account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub email: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub created_at: DateTime<Utc>,
    pub group_id: Option<GroupId>,
}

/// Customer identity denormalized onto an order at checkout time.
///
/// Guest checkouts never create an account row, so this snapshot from the
/// most recent order is the only identity the store has for them.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CustomerSnapshot {
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub group_id: Option<GroupId>,
}
