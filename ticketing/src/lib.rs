//! Ticketing service - HTTP front end for the ticket purchase core.
//!
//! Wires the purchase coordinator from `ticketing-runtime` to `PostgreSQL`
//! stores, a confirmation notifier and an Axum router.
//!
//! # Architecture
//!
//! ```text
//!   HTTP (axum)
//!       │
//!       ▼
//! ┌─────────────────────┐      ┌───────────────────────────┐
//! │ PurchaseCoordinator │─────▶│ InventoryLedger           │
//! │  validate           │      │  version CAS + retry      │
//! │  reserve            │      └─────────────┬─────────────┘
//! │  issue ticket       │                    ▼
//! │  compensate         │      PostgresCatalogStore (events)
//! └──────────┬──────────┘
//!            │  PostgresBuyerDirectory (buyers)
//!            │  PostgresTicketStore    (tickets)
//!            ▼
//!   NotificationDispatcher ──▶ SmtpNotifier | ConsoleNotifier
//!   (detached, bounded by a timeout)
//! ```
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `GET /api/events`, `GET /api/events/:id`
//! - `POST /api/tickets/purchase`
//! - `GET /api/tickets/:code`
//! - `POST /api/tickets/:code/cancel`, `POST /api/tickets/:code/use`
//! - `GET /api/buyers/:email/tickets`
//!
//! Prometheus metrics are served on a separate listener at `/metrics`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod app;
pub mod config;
pub mod notifier;
pub mod server;

pub use app::{StartupError, TicketingApp};
pub use config::Config;
