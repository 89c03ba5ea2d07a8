//! Database operations for the shop `PostgreSQL` instance.
//!
//! # Tables (`shop` schema)
//!
//! - `product` - The mutable catalog (the only entity this service writes)
//! - `user` - Identity rows owned by the auth layer; read here for the
//!   admin gate only
//!
//! Orders deliberately have no table: order views are re-derived from the
//! payment processor on every read.
//!
//! # Migrations
//!
//! Migrations live in `crates/shop/migrations/` and are applied at startup;
//! they can also be run by hand:
//! ```bash
//! sqlx migrate run --source crates/shop/migrations
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod products;
pub mod users;

pub use products::{ProductFilter, ProductRepository, SortDirection};
pub use users::{UserRepository, UserRole};

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// The pool is process-wide: built once at startup and shared by every
/// in-flight request.
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
