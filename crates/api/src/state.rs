//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ProvisionerConfig;
use crate::shopify::{ProvisionError, ShopifyTransport};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProvisionerConfig,
    pool: PgPool,
    transport: ShopifyTransport,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ProvisionerConfig, pool: PgPool) -> Result<Self, ProvisionError> {
        let transport = ShopifyTransport::new(&config.shopify)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                transport,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ProvisionerConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Shopify Admin API transport.
    #[must_use]
    pub fn transport(&self) -> &ShopifyTransport {
        &self.inner.transport
    }
}
