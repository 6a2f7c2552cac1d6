//! Purchase coordinator: the inventory-safe purchase transaction and the
//! ticket lifecycle operations around it.
//!
//! # Purchase
//!
//! ```text
//! validate ──► reserve ──► resolve buyer ──► price ──► code ──► save ──► dispatch
//!   │            │              │              │                  │         (detached)
//!   ▼            ▼              └──────────────┴──────────────────┘
//! reject      reject                     │ failure
//! (no I/O)  (no mutation)                ▼
//!                                 restore reservation, return error
//! ```
//!
//! A purchase is committed once the ticket is saved. Nothing observable is left
//! behind by a purchase that fails before that point.

use crate::dispatch::{DEFAULT_NOTIFICATION_TIMEOUT, NotificationDispatcher};
use crate::ledger::{InventoryLedger, Reservation};
use crate::metrics;
use crate::retry::RetryPolicy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use ticketing_core::environment::{Clock, CodeGenerator};
use ticketing_core::error::Result;
use ticketing_core::providers::{BuyerDirectory, CatalogStore, Notifier, TicketStore};
use ticketing_core::validation::{ValidatedPurchase, validate_purchase};
use ticketing_core::{
    Buyer, BuyerId, Confirmation, EmailAddress, Event, EventId, PurchaseRequest, Ticket,
    TicketCode, TicketStatus, TicketingError, ValidationError,
};

/// Default per-purchase ticket cap.
pub const DEFAULT_MAX_QUANTITY: u32 = 10;

/// Collaborators the coordinator drives.
#[derive(Clone)]
pub struct PurchaseEnvironment {
    /// Event metadata and availability
    pub catalog: Arc<dyn CatalogStore>,
    /// Buyer resolution
    pub buyers: Arc<dyn BuyerDirectory>,
    /// Ticket persistence
    pub tickets: Arc<dyn TicketStore>,
    /// Confirmation delivery
    pub notifier: Arc<dyn Notifier>,
    /// Ticket code allocation
    pub codes: Arc<dyn CodeGenerator>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}

/// Tunables for the purchase path.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseSettings {
    /// Bound on version-conflict retries in the ledger
    pub retry: RetryPolicy,
    /// Largest quantity a single purchase may request
    pub max_quantity: u32,
    /// Upper bound on one confirmation delivery
    pub notification_timeout: Duration,
}

impl Default for PurchaseSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_quantity: DEFAULT_MAX_QUANTITY,
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }
}

/// Coordinates purchase, cancellation and lookup of tickets.
#[derive(Clone)]
pub struct PurchaseCoordinator {
    catalog: Arc<dyn CatalogStore>,
    ledger: InventoryLedger,
    buyers: Arc<dyn BuyerDirectory>,
    tickets: Arc<dyn TicketStore>,
    codes: Arc<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    dispatcher: NotificationDispatcher,
    max_quantity: u32,
}

impl PurchaseCoordinator {
    /// Wires a coordinator from its collaborators and settings.
    #[must_use]
    pub fn new(env: PurchaseEnvironment, settings: PurchaseSettings) -> Self {
        Self {
            ledger: InventoryLedger::new(Arc::clone(&env.catalog), settings.retry),
            catalog: env.catalog,
            buyers: env.buyers,
            tickets: env.tickets,
            codes: env.codes,
            clock: env.clock,
            dispatcher: NotificationDispatcher::new(env.notifier, settings.notification_timeout),
            max_quantity: settings.max_quantity,
        }
    }

    /// The ledger guarding event availability.
    #[must_use]
    pub const fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Buys `request.quantity` tickets for one event.
    ///
    /// On success the ticket is persisted ACTIVE, the event's availability is
    /// reduced by the quantity, and a confirmation has been handed to the
    /// notifier on a detached task.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::Validation`]: bad input, or `price × quantity`
    ///   overflows
    /// - [`TicketingError::EventNotFound`]
    /// - [`TicketingError::InsufficientInventory`]
    /// - [`TicketingError::ConcurrencyConflict`] / [`TicketingError::DuplicateCode`]:
    ///   transient, the request may be retried as is
    /// - [`TicketingError::Storage`]
    ///
    /// Every error leaves availability, buyers and tickets as they were,
    /// except that a buyer created during a failed attempt stays registered.
    #[tracing::instrument(
        skip(self, request),
        fields(event_id = %request.event_id, quantity = request.quantity)
    )]
    pub async fn purchase(&self, request: PurchaseRequest) -> Result<Ticket> {
        let started = Instant::now();
        let result = self.execute_purchase(&request).await;

        match &result {
            Ok(ticket) => {
                metrics::record_purchase_committed(
                    ticket.quantity,
                    ticket.total_price.minor_units(),
                    started.elapsed().as_secs_f64(),
                );
                tracing::info!(
                    code = %ticket.code,
                    total = %ticket.total_price,
                    "Purchase committed"
                );
            }
            Err(error) if error.is_user_error() => {
                metrics::record_purchase_rejected();
                tracing::info!(%error, "Purchase rejected");
            }
            Err(error) => {
                metrics::record_purchase_failed();
                tracing::warn!(%error, transient = error.is_transient(), "Purchase failed");
            }
        }

        result
    }

    async fn execute_purchase(&self, request: &PurchaseRequest) -> Result<Ticket> {
        let purchase = validate_purchase(request, self.max_quantity)?;
        let reservation = self
            .ledger
            .reserve(purchase.event_id, purchase.quantity)
            .await?;

        match self.issue(&purchase, &reservation).await {
            Ok((ticket, buyer)) => {
                self.dispatcher.dispatch(Confirmation {
                    ticket: ticket.clone(),
                    buyer,
                    event: reservation.event,
                });
                Ok(ticket)
            }
            Err(error) => {
                self.compensate(&reservation, &error).await;
                Err(error)
            }
        }
    }

    /// Everything between the reservation and the commit point.
    async fn issue(
        &self,
        purchase: &ValidatedPurchase,
        reservation: &Reservation,
    ) -> Result<(Ticket, Buyer)> {
        let total_price = reservation
            .event
            .price
            .checked_multiply(purchase.quantity)
            .ok_or(ValidationError::PriceOverflow {
                quantity: purchase.quantity,
            })?;

        let buyer = self.resolve_buyer(purchase).await?;

        let ticket = Ticket::issue(
            self.codes.next_code(),
            purchase.event_id,
            buyer.id,
            purchase.quantity,
            total_price,
            self.clock.now(),
        );
        self.tickets.save(ticket.clone()).await?;

        Ok((ticket, buyer))
    }

    async fn resolve_buyer(&self, purchase: &ValidatedPurchase) -> Result<Buyer> {
        if let Some(buyer) = self
            .buyers
            .find_by_email(purchase.buyer_email.clone())
            .await?
        {
            return Ok(buyer);
        }

        let candidate = Buyer {
            id: BuyerId::new(),
            email: purchase.buyer_email.clone(),
            name: purchase.buyer_name.clone(),
            phone: purchase.buyer_phone.clone(),
            created_at: self.clock.now(),
        };
        let buyer = self.buyers.create_if_absent(candidate).await?;
        tracing::debug!(buyer_id = %buyer.id, "Buyer resolved");
        Ok(buyer)
    }

    /// Gives a failed purchase's reservation back to the event.
    async fn compensate(&self, reservation: &Reservation, cause: &TicketingError) {
        let event_id = reservation.event.id;
        match self.ledger.release(event_id, reservation.quantity).await {
            Ok(_) => {
                metrics::record_compensation("restored");
                tracing::warn!(
                    %event_id,
                    quantity = reservation.quantity,
                    %cause,
                    "Purchase aborted after reservation, inventory restored"
                );
            }
            Err(error) => {
                metrics::record_compensation("failed");
                tracing::error!(
                    %event_id,
                    quantity = reservation.quantity,
                    %cause,
                    %error,
                    "Failed to restore inventory for aborted purchase"
                );
            }
        }
    }

    /// Cancels an ACTIVE ticket and returns its quantity to the event.
    ///
    /// The status flip is conditional on the ticket still being ACTIVE, so of
    /// two concurrent cancels exactly one restores inventory. The quantity is
    /// handed back through [`InventoryLedger::release`]; if that still fails
    /// the ticket is flipped back to ACTIVE.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::TicketNotFound`]
    /// - [`TicketingError::InvalidState`] if the ticket is not ACTIVE
    /// - [`TicketingError::ConcurrencyConflict`], [`TicketingError::CapacityExceeded`]
    ///   or [`TicketingError::Storage`] from the restoration
    #[tracing::instrument(skip_all, fields(code = %code))]
    pub async fn cancel(&self, code: TicketCode) -> Result<Ticket> {
        let ticket = self.tickets.find_by_code(code.clone()).await?;
        let cancelled = self.transition(&ticket, TicketStatus::Cancelled).await?;

        if let Err(error) = self
            .ledger
            .release(cancelled.event_id, cancelled.quantity)
            .await
        {
            self.revert_cancellation(code, &error).await;
            return Err(error);
        }

        metrics::record_cancellation(cancelled.quantity);
        tracing::info!(
            event_id = %cancelled.event_id,
            quantity = cancelled.quantity,
            "Ticket cancelled"
        );
        Ok(cancelled)
    }

    /// Moves `ticket` to `next` if the lifecycle allows it, conditional on
    /// its status not having changed since it was read.
    async fn transition(&self, ticket: &Ticket, next: TicketStatus) -> Result<Ticket> {
        if !ticket.status.can_transition_to(next) {
            return Err(TicketingError::InvalidState {
                code: ticket.code.clone(),
                status: ticket.status,
            });
        }
        Ok(self
            .tickets
            .update_status(ticket.code.clone(), ticket.status, next)
            .await?)
    }

    /// CANCELLED → ACTIVE, the one transition outside the lifecycle: it only
    /// undoes a cancellation whose inventory could not be handed back.
    async fn revert_cancellation(&self, code: TicketCode, cause: &TicketingError) {
        match self
            .tickets
            .update_status(code, TicketStatus::Cancelled, TicketStatus::Active)
            .await
        {
            Ok(_) => {
                metrics::record_compensation("reverted");
                tracing::warn!(%cause, "Cancellation reverted, inventory could not be restored");
            }
            Err(error) => {
                metrics::record_compensation("failed");
                tracing::error!(
                    %cause,
                    %error,
                    "Ticket left CANCELLED without restored inventory"
                );
            }
        }
    }

    /// Marks an ACTIVE ticket as USED (scanned at the entrance).
    ///
    /// # Errors
    ///
    /// - [`TicketingError::TicketNotFound`]
    /// - [`TicketingError::InvalidState`] if the ticket is not ACTIVE
    /// - [`TicketingError::Storage`]
    #[tracing::instrument(skip_all, fields(code = %code))]
    pub async fn mark_used(&self, code: TicketCode) -> Result<Ticket> {
        let ticket = self.tickets.find_by_code(code).await?;
        let ticket = self.transition(&ticket, TicketStatus::Used).await?;
        tracing::info!("Ticket used");
        Ok(ticket)
    }

    /// Looks up a ticket by code.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::TicketNotFound`]
    /// - [`TicketingError::Storage`]
    pub async fn ticket(&self, code: TicketCode) -> Result<Ticket> {
        Ok(self.tickets.find_by_code(code).await?)
    }

    /// All tickets bought with `email`, most recent first.
    ///
    /// An unknown buyer has no tickets.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::Validation`] if `email` is malformed
    /// - [`TicketingError::Storage`]
    pub async fn tickets_for_buyer(&self, email: &str) -> Result<Vec<Ticket>> {
        let email = EmailAddress::parse(email)?;
        match self.buyers.find_by_email(email).await? {
            Some(buyer) => Ok(self.tickets.find_by_buyer(buyer.id).await?),
            None => Ok(Vec::new()),
        }
    }

    /// Looks up an event.
    ///
    /// # Errors
    ///
    /// - [`TicketingError::EventNotFound`]
    /// - [`TicketingError::Storage`]
    pub async fn event(&self, event_id: EventId) -> Result<Event> {
        Ok(self.catalog.get_event(event_id).await?)
    }

    /// Lists all events.
    ///
    /// # Errors
    ///
    /// Returns [`TicketingError::Storage`] on backend failure.
    pub async fn events(&self) -> Result<Vec<Event>> {
        Ok(self.catalog.list_events().await?)
    }
}
