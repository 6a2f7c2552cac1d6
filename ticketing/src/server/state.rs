//! Application state for the ticketing HTTP server.

use std::sync::Arc;
use ticketing_runtime::PurchaseCoordinator;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Purchase, cancellation and lookup operations
    pub coordinator: Arc<PurchaseCoordinator>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(coordinator: PurchaseCoordinator) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
        }
    }
}
