//! `PostgreSQL` stores for the ticketing service.
//!
//! Implements the provider traits from `ticketing-core` with sqlx:
//!
//! - [`PostgresCatalogStore`]: `UPDATE … WHERE version = $n` compare-and-swap
//!   on an event's availability
//! - [`PostgresBuyerDirectory`]: `INSERT … ON CONFLICT (email) DO NOTHING`
//!   followed by a refetch
//! - [`PostgresTicketStore`]: primary key on the code, conditional status
//!   updates
//!
//! Schema lives in `migrations/` and is embedded with [`migrate`].
//!
//! # Example
//!
//! ```ignore
//! use ticketing_postgres::{PoolSettings, connect, migrate, PostgresCatalogStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = connect("postgres://localhost/ticketing", &PoolSettings::default()).await?;
//!     migrate(&pool).await?;
//!     let catalog = PostgresCatalogStore::new(pool);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod buyers;
mod catalog;
mod rows;
mod tickets;

pub use buyers::PostgresBuyerDirectory;
pub use catalog::PostgresCatalogStore;
pub use tickets::PostgresTicketStore;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use ticketing_core::StoreError;

/// Connection pool sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// Connections kept open when idle
    pub min_connections: u32,
    /// How long to wait for a connection
    pub connect_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Open a connection pool.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the database is unreachable.
pub async fn connect(url: &str, settings: &PoolSettings) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.connect_timeout)
        .connect(url)
        .await
        .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))
}

/// Run the embedded migrations.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
    tracing::info!("Database migrations applied");
    Ok(())
}
