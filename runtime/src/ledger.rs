//! Inventory ledger: reserve and restore tickets against an event's
//! availability without overselling.
//!
//! # Protocol
//!
//! Every adjustment is a read-check-write loop over the catalog's
//! compare-and-swap primitive:
//!
//! ```text
//! read event (available, version)
//!    │
//!    ├── check (enough tickets / capacity not exceeded) ──► fail, no retry
//!    │
//!    └── update_availability(new, expected = version)
//!           ├── Ok(new_version)      ──► done
//!           └── VersionMismatch      ──► back off, re-read (bounded)
//! ```
//!
//! There is no lock: two concurrent buyers both read `version = n`, only one
//! write of `n → n+1` commits, the other re-reads and re-checks.
//!
//! Giving back tickets that are already held ([`InventoryLedger::release`])
//! can only lose a version race, so it retries far longer than a reservation.

use crate::metrics;
use crate::retry::{RetryPolicy, retry_with_predicate};
use std::sync::Arc;
use thiserror::Error;
use ticketing_core::error::Result;
use ticketing_core::providers::CatalogStore;
use ticketing_core::{Event, EventId, StoreError, TicketingError, ValidationError, Version};

/// Tickets taken out of an event's availability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// Event snapshot as written by the reservation (its price is the price
    /// the purchase is charged at)
    pub event: Event,
    /// Reserved quantity
    pub quantity: u32,
}

/// Read-only view of an event's inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Availability {
    /// Event
    pub event_id: EventId,
    /// Tickets still for sale
    pub available: u32,
    /// Capacity
    pub total: u32,
    /// Current version
    pub version: Version,
}

/// Outcome of a single read-check-write attempt.
#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("only {available} tickets available")]
    Insufficient { available: u32 },

    #[error("restoring would exceed capacity ({available} of {total} available)")]
    OverCapacity { available: u32, total: u32 },
}

impl AttemptError {
    const fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(StoreError::VersionMismatch { .. }))
    }
}

/// Lower bound on conflict retries when handing held tickets back.
pub const RELEASE_MAX_RETRIES: u32 = 64;

/// Direction of an availability adjustment.
#[derive(Clone, Copy, Debug)]
enum Adjustment {
    Reserve(u32),
    Restore(u32),
}

/// Guards per-event availability with optimistic concurrency.
#[derive(Clone)]
pub struct InventoryLedger {
    catalog: Arc<dyn CatalogStore>,
    policy: RetryPolicy,
    release_policy: RetryPolicy,
}

impl InventoryLedger {
    /// Creates a ledger over `catalog`, retrying conflicts per `policy`.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogStore>, policy: RetryPolicy) -> Self {
        let release_policy = RetryPolicy {
            max_retries: policy.max_retries.max(RELEASE_MAX_RETRIES),
            ..policy.clone()
        };
        Self {
            catalog,
            policy,
            release_policy,
        }
    }

    /// The retry policy applied to version conflicts.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Takes `quantity` tickets out of the event's availability.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::EventNotFound`]
    /// - [`TicketingError::InsufficientInventory`] (never retried)
    /// - [`TicketingError::ConcurrencyConflict`] once the retry bound is hit
    /// - [`TicketingError::Storage`]
    pub async fn reserve(&self, event_id: EventId, quantity: u32) -> Result<Reservation> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let event = self
            .adjust(&self.policy, event_id, Adjustment::Reserve(quantity))
            .await?;
        tracing::debug!(
            %event_id,
            quantity,
            available = event.available_tickets,
            version = %event.version,
            "Inventory reserved"
        );
        Ok(Reservation { event, quantity })
    }

    /// Puts `quantity` tickets back into the event's availability.
    ///
    /// Returns the event as written.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::CapacityExceeded`] if `available + quantity > total`
    /// - [`TicketingError::EventNotFound`]
    /// - [`TicketingError::ConcurrencyConflict`] once the retry bound is hit
    /// - [`TicketingError::Storage`]
    pub async fn restore(&self, event_id: EventId, quantity: u32) -> Result<Event> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let event = self
            .adjust(&self.policy, event_id, Adjustment::Restore(quantity))
            .await?;
        tracing::debug!(
            %event_id,
            quantity,
            available = event.available_tickets,
            version = %event.version,
            "Inventory restored"
        );
        Ok(event)
    }

    /// Hands back `quantity` tickets the caller already holds: a reservation
    /// whose purchase failed, or a ticket that has been cancelled.
    ///
    /// Same check as [`restore`](Self::restore), but version conflicts are
    /// retried up to [`RELEASE_MAX_RETRIES`] times (or the configured bound,
    /// whichever is larger).
    ///
    /// # Errors
    ///
    /// As [`restore`](Self::restore).
    pub async fn release(&self, event_id: EventId, quantity: u32) -> Result<Event> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let event = self
            .adjust(&self.release_policy, event_id, Adjustment::Restore(quantity))
            .await?;
        tracing::debug!(
            %event_id,
            quantity,
            available = event.available_tickets,
            version = %event.version,
            "Inventory released"
        );
        Ok(event)
    }

    /// Current inventory of an event.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::EventNotFound`]
    /// - [`TicketingError::Storage`]
    pub async fn availability(&self, event_id: EventId) -> Result<Availability> {
        let event = self.catalog.get_event(event_id).await?;
        Ok(Availability {
            event_id,
            available: event.available_tickets,
            total: event.total_tickets,
            version: event.version,
        })
    }

    async fn adjust(
        &self,
        policy: &RetryPolicy,
        event_id: EventId,
        adjustment: Adjustment,
    ) -> Result<Event> {
        let outcome = retry_with_predicate(
            policy,
            || self.attempt(event_id, adjustment),
            AttemptError::is_conflict,
        )
        .await;

        outcome.map_err(|err| match (err, adjustment) {
            (AttemptError::Store(StoreError::VersionMismatch { .. }), _) => {
                tracing::warn!(
                    %event_id,
                    attempts = policy.max_attempts(),
                    "Inventory update abandoned after repeated version conflicts"
                );
                TicketingError::ConcurrencyConflict {
                    event_id,
                    attempts: policy.max_attempts(),
                }
            }
            (AttemptError::Store(store), _) => store.into(),
            (AttemptError::Insufficient { available }, Adjustment::Reserve(requested)) => {
                TicketingError::InsufficientInventory {
                    event_id,
                    requested,
                    available,
                }
            }
            (AttemptError::OverCapacity { available, total }, Adjustment::Restore(requested)) => {
                TicketingError::CapacityExceeded {
                    event_id,
                    requested,
                    available,
                    total,
                }
            }
            (other, _) => TicketingError::Storage(other.to_string()),
        })
    }

    async fn attempt(
        &self,
        event_id: EventId,
        adjustment: Adjustment,
    ) -> std::result::Result<Event, AttemptError> {
        let mut event = self.catalog.get_event(event_id).await?;

        let new_available = match adjustment {
            Adjustment::Reserve(quantity) => {
                if !event.has_available(quantity) {
                    return Err(AttemptError::Insufficient {
                        available: event.available_tickets,
                    });
                }
                event.available_tickets - quantity
            }
            Adjustment::Restore(quantity) => event
                .available_tickets
                .checked_add(quantity)
                .filter(|restored| *restored <= event.total_tickets)
                .ok_or(AttemptError::OverCapacity {
                    available: event.available_tickets,
                    total: event.total_tickets,
                })?,
        };

        let version = self
            .catalog
            .update_availability(event_id, new_available, event.version)
            .await
            .inspect_err(|err| {
                if matches!(err, StoreError::VersionMismatch { .. }) {
                    metrics::record_inventory_conflict();
                }
            })?;

        event.available_tickets = new_available;
        event.version = version;
        metrics::record_tickets_available(event_id, new_available);
        Ok(event)
    }
}
