//! # Ticketing Runtime
//!
//! The inventory-safe purchase transaction.
//!
//! ## Core Components
//!
//! - **[`InventoryLedger`]**: reserve/restore over a version compare-and-swap
//!   with bounded, jittered retry
//! - **[`PurchaseCoordinator`]**: validate → reserve → resolve buyer → issue
//!   ticket → dispatch confirmation, with compensation on failure; plus
//!   cancel, mark-used and lookups
//! - **[`NotificationDispatcher`]**: detached, time-bounded confirmation
//!   delivery
//! - **[`metrics`]**: business counters and the Prometheus recorder
//!
//! ## Example
//!
//! ```ignore
//! use ticketing_runtime::{PurchaseCoordinator, PurchaseEnvironment, PurchaseSettings};
//!
//! let coordinator = PurchaseCoordinator::new(env, PurchaseSettings::default());
//! let ticket = coordinator.purchase(request).await?;
//! println!("Your ticket: {}", ticket.code);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Purchase transaction and ticket lifecycle
pub mod coordinator;

/// Detached confirmation delivery
pub mod dispatch;

/// Optimistic-concurrency inventory ledger
pub mod ledger;

/// Prometheus metrics for observability
pub mod metrics;

/// Retry logic with exponential backoff
pub mod retry;

pub use coordinator::{PurchaseCoordinator, PurchaseEnvironment, PurchaseSettings};
pub use dispatch::NotificationDispatcher;
pub use ledger::{Availability, InventoryLedger, Reservation};
pub use retry::RetryPolicy;
