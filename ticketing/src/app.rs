//! Application wiring: configuration in, a ready coordinator and router out.

use crate::config::Config;
use crate::notifier::{ConsoleNotifier, SmtpNotifier};
use crate::server::{AppState, build_router};
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use ticketing_core::environment::{RandomCodeGenerator, SystemClock};
use ticketing_core::providers::{Notifier, NotifyError};
use ticketing_core::StoreError;
use ticketing_postgres::{
    PostgresBuyerDirectory, PostgresCatalogStore, PostgresTicketStore, connect, migrate,
};
use ticketing_runtime::{PurchaseCoordinator, PurchaseEnvironment};

/// Startup failures.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Database connection or migration failed
    #[error("Database error: {0}")]
    Database(#[from] StoreError),

    /// Notifier could not be configured
    #[error("Notifier error: {0}")]
    Notifier(#[from] NotifyError),
}

/// The assembled ticketing service.
pub struct TicketingApp {
    state: AppState,
    config: Config,
}

impl TicketingApp {
    /// Connect to `PostgreSQL`, apply migrations and build the coordinator.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError`] if the database is unreachable, a migration
    /// fails, or the SMTP settings are invalid.
    pub async fn new(config: Config) -> Result<Self, StartupError> {
        tracing::info!("Connecting to PostgreSQL...");
        let pool = connect(&config.database.url, &config.pool_settings()).await?;

        tracing::info!("Running database migrations...");
        migrate(&pool).await?;

        let env = PurchaseEnvironment {
            catalog: Arc::new(PostgresCatalogStore::new(pool.clone())),
            buyers: Arc::new(PostgresBuyerDirectory::new(pool.clone())),
            tickets: Arc::new(PostgresTicketStore::new(pool)),
            notifier: notifier_for(&config)?,
            codes: Arc::new(RandomCodeGenerator::with_prefix(
                config.purchase.code_prefix.clone(),
            )),
            clock: Arc::new(SystemClock),
        };

        let coordinator = PurchaseCoordinator::new(env, config.purchase_settings());
        Ok(Self {
            state: AppState::new(coordinator),
            config,
        })
    }

    /// The HTTP router over this app's state.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

/// SMTP when `SMTP_HOST` is configured, console logging otherwise.
///
/// # Errors
///
/// Returns [`NotifyError`] if the SMTP settings are invalid.
pub fn notifier_for(config: &Config) -> Result<Arc<dyn Notifier>, NotifyError> {
    match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "Using SMTP notifier");
            Ok(Arc::new(SmtpNotifier::new(smtp)?))
        }
        None => {
            tracing::info!("SMTP_HOST not set, logging confirmations to the console");
            Ok(Arc::new(ConsoleNotifier::new()))
        }
    }
}
