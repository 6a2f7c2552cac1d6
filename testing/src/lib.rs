//! # Ticketing Testing
//!
//! Testing utilities for the ticketing service.
//!
//! This crate provides:
//! - In-memory implementations of every provider trait
//! - Failure injection (version conflicts, failed saves, slow or failing notifiers)
//! - Deterministic environment (`FixedClock`, `SequentialCodeGenerator`)
//! - Fixtures for events and purchase requests
//!
//! ## Example
//!
//! ```ignore
//! use ticketing_testing::{InMemoryCatalogStore, fixtures};
//!
//! #[tokio::test]
//! async fn test_reserve() {
//!     let catalog = Arc::new(InMemoryCatalogStore::new());
//!     let event = fixtures::event(10, 100);
//!     catalog.insert_event(event.clone());
//!
//!     let ledger = InventoryLedger::new(catalog, RetryPolicy::default());
//!     let reservation = ledger.reserve(event.id, 3).await.unwrap();
//!     assert_eq!(reservation.event.available_tickets, 7);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Deterministic clock and code generators
pub mod mocks;

/// Mock confirmation notifier
pub mod notifier;

/// In-memory store implementations
pub mod stores;

/// Test data builders
pub mod fixtures;

// Re-export commonly used items
pub use mocks::{FixedClock, RepeatingCodeGenerator, SequentialCodeGenerator, test_clock};
pub use notifier::{MockNotifier, NotifierBehavior};
pub use stores::{
    ConflictingCatalogStore, InMemoryBuyerDirectory, InMemoryCatalogStore, InMemoryTicketStore,
};
