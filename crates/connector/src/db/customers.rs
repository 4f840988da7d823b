//! Customer repository for the store read model.

use sqlx::PgPool;

use zendesk_bridge_core::Email;

use super::RepositoryError;
use crate::models::CustomerRecord;

/// Read-only access to registered customer accounts.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up a registered customer by exact email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<CustomerRecord>, RepositoryError> {
        let record = sqlx::query_as::<_, CustomerRecord>(
            r"
            SELECT entity_id AS id, email, firstname, lastname, created_at, group_id
            FROM customer
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }
}
