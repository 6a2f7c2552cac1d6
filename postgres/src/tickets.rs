//! Ticket storage backed by the `tickets` table.

use crate::rows::{self, db_error};
use sqlx::PgPool;
use ticketing_core::providers::{StoreFuture, TicketStore};
use ticketing_core::{BuyerId, StoreError, Ticket, TicketCode, TicketStatus};

/// `PostgreSQL` ticket store.
#[derive(Clone)]
pub struct PostgresTicketStore {
    pool: PgPool,
}

impl PostgresTicketStore {
    /// Create a ticket store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, code: &TicketCode) -> Result<Option<Ticket>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT code, event_id, buyer_id, quantity, total_price_minor_units,
                   purchased_at, status
            FROM tickets
            WHERE code = $1
            ",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load ticket"))?;

        row.as_ref().map(rows::ticket).transpose()
    }
}

impl TicketStore for PostgresTicketStore {
    fn save(&self, ticket: Ticket) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query(
                r"
                INSERT INTO tickets
                    (code, event_id, buyer_id, quantity, total_price_minor_units,
                     purchased_at, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(ticket.code.as_str())
            .bind(*ticket.event_id.as_uuid())
            .bind(*ticket.buyer_id.as_uuid())
            .bind(rows::to_i32(ticket.quantity, "quantity")?)
            .bind(rows::to_i64(
                ticket.total_price.minor_units(),
                "total_price_minor_units",
            )?)
            .bind(ticket.purchased_at)
            .bind(ticket.status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return StoreError::DuplicateCode(ticket.code.clone());
                    }
                }
                db_error("Failed to save ticket")(e)
            })?;

            Ok(())
        })
    }

    fn find_by_code(&self, code: TicketCode) -> StoreFuture<'_, Ticket> {
        Box::pin(async move {
            self.fetch(&code)
                .await?
                .ok_or(StoreError::TicketNotFound(code))
        })
    }

    fn update_status(
        &self,
        code: TicketCode,
        expected: TicketStatus,
        new: TicketStatus,
    ) -> StoreFuture<'_, Ticket> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                UPDATE tickets
                SET status = $3
                WHERE code = $1
                  AND status = $2
                RETURNING code, event_id, buyer_id, quantity, total_price_minor_units,
                          purchased_at, status
                ",
            )
            .bind(code.as_str())
            .bind(expected.as_str())
            .bind(new.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to update ticket status"))?;

            if let Some(row) = row {
                return rows::ticket(&row);
            }

            match self.fetch(&code).await? {
                None => Err(StoreError::TicketNotFound(code)),
                Some(current) => Err(StoreError::StatusMismatch {
                    code,
                    expected,
                    actual: current.status,
                }),
            }
        })
    }

    fn find_by_buyer(&self, buyer_id: BuyerId) -> StoreFuture<'_, Vec<Ticket>> {
        Box::pin(async move {
            let found = sqlx::query(
                r"
                SELECT code, event_id, buyer_id, quantity, total_price_minor_units,
                       purchased_at, status
                FROM tickets
                WHERE buyer_id = $1
                ORDER BY purchased_at DESC, code
                ",
            )
            .bind(*buyer_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list tickets"))?;

            found.iter().map(rows::ticket).collect()
        })
    }
}
