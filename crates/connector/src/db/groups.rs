//! Customer group repository for the store read model.

use sqlx::PgPool;

use zendesk_bridge_core::GroupId;

use super::RepositoryError;

/// Read-only access to customer group labels.
pub struct GroupRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GroupRepository<'a> {
    /// Create a new group repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the human-readable group code for a group ID.
    ///
    /// Returns `None` for an unknown ID; the caller decides the placeholder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn code_by_id(&self, id: GroupId) -> Result<Option<String>, RepositoryError> {
        let code = sqlx::query_scalar::<_, String>(
            r"
            SELECT customer_group_code
            FROM customer_group
            WHERE customer_group_id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(code)
    }
}
