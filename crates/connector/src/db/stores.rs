//! Store/website repository for the store read model.

use sqlx::PgPool;

use zendesk_bridge_core::StoreId;

use super::RepositoryError;

/// Read-only access to store-to-website naming.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve the display name of the website owning the given store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn website_name(&self, store_id: StoreId) -> Result<Option<String>, RepositoryError> {
        let name = sqlx::query_scalar::<_, String>(
            r"
            SELECT w.name
            FROM store s
            JOIN store_website w ON w.website_id = s.website_id
            WHERE s.store_id = $1
            ",
        )
        .bind(store_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(name)
    }
}
