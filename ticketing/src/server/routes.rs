//! Router configuration for the ticketing service.

use super::health::health_check;
use super::state::AppState;
use crate::api::{buyers, events, tickets};
use axum::{
    Router,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health check
/// - Event browsing
/// - Ticket purchase, lookup, cancellation and check-in
/// - Buyer purchase history
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Event catalog
        .route("/events", get(events::list_events))
        .route("/events/:id", get(events::get_event))
        // Tickets
        .route("/tickets/purchase", post(tickets::purchase_tickets))
        .route("/tickets/:code", get(tickets::get_ticket))
        .route("/tickets/:code/cancel", post(tickets::cancel_ticket))
        .route("/tickets/:code/use", post(tickets::use_ticket))
        // Buyers
        .route("/buyers/:email/tickets", get(buyers::list_buyer_tickets));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Router serving the Prometheus scrape endpoint at `/metrics`.
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    )
}
