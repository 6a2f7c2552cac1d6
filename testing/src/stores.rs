//! In-memory providers.
//!
//! Each store keeps its data behind an `Arc<Mutex<_>>`, so clones share state
//! and every operation is atomic with respect to the others. Lock poisoning is
//! reported as [`StoreError::Database`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use ticketing_core::providers::{BuyerDirectory, CatalogStore, StoreFuture, TicketStore};
use ticketing_core::{
    Buyer, BuyerId, EmailAddress, Event, EventId, Money, StoreError, Ticket, TicketCode,
    TicketStatus, Version,
};

fn poisoned<T>(_: PoisonError<T>) -> StoreError {
    StoreError::Database("lock poisoned".to_string())
}

/// Decrements `counter` if it is positive; returns whether it did.
fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

// ============================================================================
// Catalog
// ============================================================================

/// In-memory event catalog with version compare-and-swap.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    events: Arc<Mutex<HashMap<EventId, Event>>>,
}

impl InMemoryCatalogStore {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<EventId, Event>>, StoreError> {
        self.events.lock().map_err(poisoned)
    }

    /// Insert or replace an event
    pub fn insert_event(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(event.id, event);
    }

    /// Change an event's price (availability and version untouched)
    pub fn set_price(&self, event_id: EventId, price: Money) {
        if let Some(event) = self
            .events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&event_id)
        {
            event.price = price;
        }
    }

    /// Current state of an event
    #[must_use]
    pub fn snapshot(&self, event_id: EventId) -> Option<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&event_id)
            .cloned()
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn get_event(&self, event_id: EventId) -> StoreFuture<'_, Event> {
        Box::pin(async move {
            self.lock()?
                .get(&event_id)
                .cloned()
                .ok_or(StoreError::EventNotFound(event_id))
        })
    }

    fn list_events(&self) -> StoreFuture<'_, Vec<Event>> {
        Box::pin(async move {
            let mut events: Vec<Event> = self.lock()?.values().cloned().collect();
            events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at).then_with(|| a.name.cmp(&b.name)));
            Ok(events)
        })
    }

    fn update_availability(
        &self,
        event_id: EventId,
        new_available: u32,
        expected_version: Version,
    ) -> StoreFuture<'_, Version> {
        Box::pin(async move {
            let mut events = self.lock()?;
            let event = events
                .get_mut(&event_id)
                .ok_or(StoreError::EventNotFound(event_id))?;

            if event.version != expected_version {
                return Err(StoreError::VersionMismatch {
                    event_id,
                    expected: expected_version,
                    actual: event.version,
                });
            }
            if new_available > event.total_tickets {
                return Err(StoreError::CapacityViolation {
                    event_id,
                    available: new_available,
                    total: event.total_tickets,
                });
            }

            event.available_tickets = new_available;
            event.version = event.version.next();
            Ok(event.version)
        })
    }
}

/// Catalog wrapper that rejects the next `n` availability writes with a
/// version mismatch, as if another writer had committed first.
///
/// Writes let through by [`after_writes`](Self::after_writes) are served
/// before any conflict.
#[derive(Clone)]
pub struct ConflictingCatalogStore {
    inner: Arc<dyn CatalogStore>,
    passing: Arc<AtomicU32>,
    remaining: Arc<AtomicU32>,
    injected: Arc<AtomicU32>,
}

impl ConflictingCatalogStore {
    /// Wrap `inner`, failing its next `conflicts` writes
    #[must_use]
    pub fn new(inner: Arc<dyn CatalogStore>, conflicts: u32) -> Self {
        Self::after_writes(inner, 0, conflicts)
    }

    /// Wrap `inner`, letting `writes` writes through and failing the
    /// `conflicts` after them
    #[must_use]
    pub fn after_writes(inner: Arc<dyn CatalogStore>, writes: u32, conflicts: u32) -> Self {
        Self {
            inner,
            passing: Arc::new(AtomicU32::new(writes)),
            remaining: Arc::new(AtomicU32::new(conflicts)),
            injected: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Arm `conflicts` more failures
    pub fn inject(&self, conflicts: u32) {
        self.remaining.fetch_add(conflicts, Ordering::SeqCst);
    }

    /// Number of conflicts returned so far
    #[must_use]
    pub fn injected_conflicts(&self) -> u32 {
        self.injected.load(Ordering::SeqCst)
    }
}

impl CatalogStore for ConflictingCatalogStore {
    fn get_event(&self, event_id: EventId) -> StoreFuture<'_, Event> {
        self.inner.get_event(event_id)
    }

    fn list_events(&self) -> StoreFuture<'_, Vec<Event>> {
        self.inner.list_events()
    }

    fn update_availability(
        &self,
        event_id: EventId,
        new_available: u32,
        expected_version: Version,
    ) -> StoreFuture<'_, Version> {
        if !take_one(&self.passing) && take_one(&self.remaining) {
            self.injected.fetch_add(1, Ordering::SeqCst);
            return Box::pin(async move {
                Err(StoreError::VersionMismatch {
                    event_id,
                    expected: expected_version,
                    actual: expected_version.next(),
                })
            });
        }
        self.inner
            .update_availability(event_id, new_available, expected_version)
    }
}

// ============================================================================
// Buyers
// ============================================================================

/// In-memory buyer directory keyed by normalized email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBuyerDirectory {
    buyers: Arc<Mutex<HashMap<EmailAddress, Buyer>>>,
    failing_creates: Arc<AtomicU32>,
}

impl InMemoryBuyerDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` `create_if_absent` calls fail with a database error
    pub fn fail_next_creates(&self, n: u32) {
        self.failing_creates.fetch_add(n, Ordering::SeqCst);
    }

    /// Number of stored buyers
    #[must_use]
    pub fn len(&self) -> usize {
        self.buyers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BuyerDirectory for InMemoryBuyerDirectory {
    fn find_by_email(&self, email: EmailAddress) -> StoreFuture<'_, Option<Buyer>> {
        Box::pin(async move { Ok(self.buyers.lock().map_err(poisoned)?.get(&email).cloned()) })
    }

    fn create_if_absent(&self, candidate: Buyer) -> StoreFuture<'_, Buyer> {
        Box::pin(async move {
            if take_one(&self.failing_creates) {
                return Err(StoreError::Database("injected buyer failure".to_string()));
            }
            let mut buyers = self.buyers.lock().map_err(poisoned)?;
            Ok(buyers
                .entry(candidate.email.clone())
                .or_insert(candidate)
                .clone())
        })
    }
}

// ============================================================================
// Tickets
// ============================================================================

/// In-memory ticket store keyed by code.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    tickets: Arc<Mutex<HashMap<TicketCode, Ticket>>>,
    failing_saves: Arc<AtomicU32>,
}

impl InMemoryTicketStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` saves fail with a database error
    pub fn fail_next_saves(&self, n: u32) {
        self.failing_saves.fetch_add(n, Ordering::SeqCst);
    }

    /// Every stored ticket, in no particular order
    #[must_use]
    pub fn all(&self) -> Vec<Ticket> {
        self.tickets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

impl TicketStore for InMemoryTicketStore {
    fn save(&self, ticket: Ticket) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            if take_one(&self.failing_saves) {
                return Err(StoreError::Database("injected save failure".to_string()));
            }
            let mut tickets = self.tickets.lock().map_err(poisoned)?;
            if tickets.contains_key(&ticket.code) {
                return Err(StoreError::DuplicateCode(ticket.code));
            }
            tickets.insert(ticket.code.clone(), ticket);
            Ok(())
        })
    }

    fn find_by_code(&self, code: TicketCode) -> StoreFuture<'_, Ticket> {
        Box::pin(async move {
            self.tickets
                .lock()
                .map_err(poisoned)?
                .get(&code)
                .cloned()
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
            let mut tickets = self.tickets.lock().map_err(poisoned)?;
            let Some(ticket) = tickets.get_mut(&code) else {
                return Err(StoreError::TicketNotFound(code));
            };
            if ticket.status != expected {
                return Err(StoreError::StatusMismatch {
                    code,
                    expected,
                    actual: ticket.status,
                });
            }
            ticket.status = new;
            Ok(ticket.clone())
        })
    }

    fn find_by_buyer(&self, buyer_id: BuyerId) -> StoreFuture<'_, Vec<Ticket>> {
        Box::pin(async move {
            let mut tickets: Vec<Ticket> = self
                .tickets
                .lock()
                .map_err(poisoned)?
                .values()
                .filter(|t| t.buyer_id == buyer_id)
                .cloned()
                .collect();
            tickets.sort_by(|a, b| {
                b.purchased_at
                    .cmp(&a.purchased_at)
                    .then_with(|| b.code.as_str().cmp(a.code.as_str()))
            });
            Ok(tickets)
        })
    }
}
