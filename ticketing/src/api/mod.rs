//! HTTP API handlers, grouped by resource:
//! - Events: browsing the catalog and live availability
//! - Tickets: purchase, lookup, cancellation and check-in
//! - Buyers: a buyer's purchase history

pub mod buyers;
pub mod error;
pub mod events;
pub mod tickets;

pub use error::AppError;
