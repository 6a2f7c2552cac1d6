//! Provider traits: the storage and delivery boundaries of the purchase core.
//!
//! The coordinator only ever talks to these traits, held as `Arc<dyn _>`, so
//! the same purchase logic runs against in-memory stores in tests and
//! PostgreSQL in production.
//!
//! ```text
//! ┌─────────────────────┐
//! │ PurchaseCoordinator │
//! └──────────┬──────────┘
//!            │
//!   ┌────────┼──────────────┬──────────────┐
//!   ▼        ▼              ▼              ▼
//! CatalogStore  BuyerDirectory  TicketStore   Notifier
//! (version CAS) (insert-if-     (unique code, (best effort)
//!                absent)         conditional
//!                                status)
//! ```
//!
//! All methods take owned arguments and return boxed futures so the traits
//! stay dyn-compatible.

use crate::error::StoreError;
use std::future::Future;
use std::pin::Pin;

pub mod buyers;
pub mod catalog;
pub mod notifier;
pub mod tickets;

pub use buyers::BuyerDirectory;
pub use catalog::CatalogStore;
pub use notifier::{Notifier, NotifyError, NotifyFuture};
pub use tickets::TicketStore;

/// Boxed future returned by store providers.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;
