//! # Ticketing Core
//!
//! Domain types, error taxonomy and provider traits for the inventory-safe
//! ticket purchase transaction.
//!
//! ## Core Concepts
//!
//! - **Event**: a scheduled event with a finite ticket inventory guarded by a
//!   version number (optimistic concurrency)
//! - **Buyer**: identified by a normalized, unique email address
//! - **Ticket**: an issued purchase, keyed by a unique human-readable code
//! - **Providers**: the storage and delivery boundaries the purchase core talks
//!   to (`CatalogStore`, `BuyerDirectory`, `TicketStore`, `Notifier`)
//! - **Environment**: injected non-determinism (`Clock`, `CodeGenerator`)
//!
//! ## Architecture
//!
//! ```text
//!   PurchaseCoordinator (ticketing-runtime)
//!        │
//!        ├── InventoryLedger ──► CatalogStore   (compare-and-swap on version)
//!        ├── BuyerDirectory                     (atomic insert-if-absent)
//!        ├── TicketStore                        (unique code, conditional status)
//!        └── Notifier                           (detached, best effort)
//! ```
//!
//! Implementations live in `ticketing-testing` (in-memory) and
//! `ticketing-postgres` (sqlx).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod environment;
pub mod error;
pub mod providers;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use error::{StoreError, TicketingError, ValidationError};
pub use types::*;
