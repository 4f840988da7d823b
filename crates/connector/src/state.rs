//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{ApiAccess, BridgeConfig};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BridgeConfig,
    pool: PgPool,
    api_access: ApiAccess,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Connector configuration
    /// * `pool` - `PostgreSQL` connection pool for the store read model
    #[must_use]
    pub fn new(config: BridgeConfig, pool: PgPool) -> Self {
        let api_access = config.api_access();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                api_access,
            }),
        }
    }

    /// Get a reference to the connector configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the API authorization settings.
    #[must_use]
    pub fn api_access(&self) -> &ApiAccess {
        &self.inner.api_access
    }
}
