//! Event catalog backed by the `events` table.

use crate::rows::{self, db_error};
use sqlx::PgPool;
use ticketing_core::providers::{CatalogStore, StoreFuture};
use ticketing_core::{Event, EventId, StoreError, Version};

/// `PostgreSQL` event catalog.
///
/// Availability writes are a single conditional `UPDATE` on `(id, version)`,
/// so concurrent reservations against one event serialize on the row lock and
/// all but one of them observe a version mismatch.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Create a catalog over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        crate::migrate(&self.pool).await
    }

    /// Insert an event as listed for sale.
    ///
    /// Event administration is outside the purchase path; this is how
    /// deployments and tests seed the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the insert fails or the event's
    /// counts do not fit the schema.
    pub async fn insert_event(&self, event: &Event) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO events
                (id, name, location, starts_at, price_minor_units,
                 available_tickets, total_tickets, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(*event.id.as_uuid())
        .bind(&event.name)
        .bind(&event.location)
        .bind(event.starts_at)
        .bind(rows::to_i64(event.price.minor_units(), "price_minor_units")?)
        .bind(rows::to_i32(event.available_tickets, "available_tickets")?)
        .bind(rows::to_i32(event.total_tickets, "total_tickets")?)
        .bind(rows::to_i64(event.version.value(), "version")?)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert event"))?;

        tracing::info!(event_id = %event.id, total = event.total_tickets, "Event listed");
        Ok(())
    }

    /// Tell apart "no such event", a lost race and a capacity breach after a
    /// conditional update matched no row.
    async fn explain_rejected_update(
        &self,
        event_id: EventId,
        new_available: u32,
        expected: Version,
    ) -> StoreError {
        let current: Result<Option<(i64, i32)>, _> =
            sqlx::query_as("SELECT version, total_tickets FROM events WHERE id = $1")
                .bind(*event_id.as_uuid())
                .fetch_optional(&self.pool)
                .await;

        match current {
            Err(e) => db_error("Failed to load event version")(e),
            Ok(None) => StoreError::EventNotFound(event_id),
            Ok(Some((version, total))) => {
                let actual = match rows::version(version) {
                    Ok(v) => v,
                    Err(e) => return e,
                };
                if actual != expected {
                    return StoreError::VersionMismatch {
                        event_id,
                        expected,
                        actual,
                    };
                }
                match rows::to_u32(total, "total_tickets") {
                    Ok(total) => StoreError::CapacityViolation {
                        event_id,
                        available: new_available,
                        total,
                    },
                    Err(e) => e,
                }
            }
        }
    }
}

impl CatalogStore for PostgresCatalogStore {
    fn get_event(&self, event_id: EventId) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT id, name, location, starts_at, price_minor_units,
                       available_tickets, total_tickets, version
                FROM events
                WHERE id = $1
                ",
            )
            .bind(*event_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load event"))?
            .ok_or(StoreError::EventNotFound(event_id))?;

            rows::event(&row)
        })
    }

    fn list_events(&self) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let found = sqlx::query(
                r"
                SELECT id, name, location, starts_at, price_minor_units,
                       available_tickets, total_tickets, version
                FROM events
                ORDER BY starts_at, name
                ",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list events"))?;

            found.iter().map(rows::event).collect()
        })
    }

    fn update_availability(
        &self,
        event_id: EventId,
        new_available: u32,
        expected_version: Version,
    ) -> StoreFuture<'_, Version> {
        Box::pin(async move {
            let new_value = rows::to_i32(new_available, "available_tickets")?;
            let expected = rows::to_i64(expected_version.value(), "version")?;

            let updated: Option<(i64,)> = sqlx::query_as(
                r"
                UPDATE events
                SET available_tickets = $2,
                    version = version + 1
                WHERE id = $1
                  AND version = $3
                  AND $2 <= total_tickets
                RETURNING version
                ",
            )
            .bind(*event_id.as_uuid())
            .bind(new_value)
            .bind(expected)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update availability"))?;

            match updated {
                Some((version,)) => {
                    tracing::debug!(
                        event_id = %event_id,
                        available = new_available,
                        version,
                        "Availability committed"
                    );
                    rows::version(version)
                }
                None => Err(self
                    .explain_rejected_update(event_id, new_available, expected_version)
                    .await),
            }
        })
    }
}
