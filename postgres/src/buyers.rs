//! Buyer directory backed by the `buyers` table.

use crate::rows::{self, db_error};
use sqlx::PgPool;
use ticketing_core::providers::{BuyerDirectory, StoreFuture};
use ticketing_core::{Buyer, EmailAddress, StoreError};

/// `PostgreSQL` buyer directory.
///
/// Uniqueness of the normalized email is enforced by the table's `UNIQUE`
/// constraint; concurrent first purchases with one email all resolve to the
/// row that won the insert.
#[derive(Clone)]
pub struct PostgresBuyerDirectory {
    pool: PgPool,
}

impl PostgresBuyerDirectory {
    /// Create a directory over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_email(&self, email: &EmailAddress) -> Result<Option<Buyer>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, email, name, phone, created_at
            FROM buyers
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load buyer"))?;

        row.as_ref().map(rows::buyer).transpose()
    }
}

impl BuyerDirectory for PostgresBuyerDirectory {
    fn find_by_email(&self, email: EmailAddress) -> StoreFuture<'_, Option<Buyer>> {
        Box::pin(async move { self.fetch_by_email(&email).await })
    }

    fn create_if_absent(&self, candidate: Buyer) -> StoreFuture<'_, Buyer> {
        Box::pin(async move {
            let inserted = sqlx::query(
                r"
                INSERT INTO buyers (id, email, name, phone, created_at)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (email) DO NOTHING
                ",
            )
            .bind(*candidate.id.as_uuid())
            .bind(candidate.email.as_str())
            .bind(&candidate.name)
            .bind(&candidate.phone)
            .bind(candidate.created_at)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to create buyer"))?
            .rows_affected();

            if inserted == 1 {
                tracing::info!(buyer_id = %candidate.id, "Buyer registered");
                return Ok(candidate);
            }

            // Lost the insert to an existing row with the same email.
            self.fetch_by_email(&candidate.email).await?.ok_or_else(|| {
                StoreError::Database(format!(
                    "Buyer {} vanished after email conflict",
                    candidate.email
                ))
            })
        })
    }
}
