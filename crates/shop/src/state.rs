//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ShopConfig;
use crate::stripe::{StripeClient, StripeError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the process-wide connection pool and
/// the Stripe client, both safe for concurrent use.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    pool: PgPool,
    stripe: StripeClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be constructed.
    pub fn new(config: ShopConfig, pool: PgPool) -> Result<Self, StripeError> {
        let stripe = StripeClient::new(&config.stripe)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                stripe,
            }),
        })
    }

    /// Get a reference to the shop configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Stripe API client.
    #[must_use]
    pub fn stripe(&self) -> &StripeClient {
        &self.inner.stripe
    }
}
