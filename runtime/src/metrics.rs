//! Business metrics for the purchase core, plus the Prometheus recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `ticketing_purchases_total{status}` - Purchases by outcome (`committed`, `rejected`, `failed`)
//! - `ticketing_tickets_sold_total` - Tickets sold
//! - `ticketing_revenue_minor_units_total` - Revenue in minor currency units
//! - `ticketing_inventory_conflicts_total` - Version conflicts on availability writes
//! - `ticketing_cancellations_total` - Tickets cancelled
//! - `ticketing_notifications_total{status}` - Confirmations by outcome (`sent`, `failed`, `timeout`)
//! - `ticketing_compensations_total{outcome}` - Compensations (`restored`, `reverted`, `failed`)
//!
//! ## Gauges
//! - `ticketing_tickets_available{event_id}` - Last observed availability per event
//!
//! ## Histograms
//! - `ticketing_purchase_duration_seconds` - Time spent in the purchase critical section

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;
use ticketing_core::EventId;

/// Errors from metrics setup.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installs the Prometheus recorder and registers metric descriptions.
///
/// Returns the handle used to render the scrape endpoint.
///
/// # Errors
///
/// Returns [`MetricsError`] if the exporter cannot be built or a recorder is
/// already installed.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5],
        )
        .map_err(|e| MetricsError::Build(e.to_string()))?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    register_metrics();
    Ok(handle)
}

/// Register all metric descriptions.
///
/// Called by [`install_recorder`]; safe to call again.
pub fn register_metrics() {
    describe_counter!(
        "ticketing_purchases_total",
        "Total purchases by status (committed, rejected, failed)"
    );
    describe_counter!("ticketing_tickets_sold_total", "Total number of tickets sold");
    describe_counter!(
        "ticketing_revenue_minor_units_total",
        "Total revenue from committed purchases in minor currency units"
    );
    describe_counter!(
        "ticketing_inventory_conflicts_total",
        "Version conflicts observed on availability writes"
    );
    describe_counter!(
        "ticketing_cancellations_total",
        "Total number of tickets cancelled"
    );
    describe_counter!(
        "ticketing_notifications_total",
        "Purchase confirmations by status (sent, failed, timeout)"
    );
    describe_counter!(
        "ticketing_compensations_total",
        "Compensations by outcome (restored, reverted, failed)"
    );
    describe_gauge!(
        "ticketing_tickets_available",
        "Last observed number of available tickets per event"
    );
    describe_histogram!(
        "ticketing_purchase_duration_seconds",
        "Time taken by the purchase critical section"
    );

    tracing::debug!("Business metrics registered");
}

// ============================================================================
// Metric Recording Functions
// ============================================================================

/// Record a committed purchase.
pub fn record_purchase_committed(quantity: u32, revenue_minor_units: u64, duration_secs: f64) {
    metrics::counter!("ticketing_purchases_total", "status" => "committed").increment(1);
    metrics::counter!("ticketing_tickets_sold_total").increment(u64::from(quantity));
    metrics::counter!("ticketing_revenue_minor_units_total").increment(revenue_minor_units);
    metrics::histogram!("ticketing_purchase_duration_seconds").record(duration_secs);
}

/// Record a purchase rejected because of the caller's request.
pub fn record_purchase_rejected() {
    metrics::counter!("ticketing_purchases_total", "status" => "rejected").increment(1);
}

/// Record a purchase that failed for a non-user reason.
pub fn record_purchase_failed() {
    metrics::counter!("ticketing_purchases_total", "status" => "failed").increment(1);
}

/// Record a version conflict on an availability write.
pub fn record_inventory_conflict() {
    metrics::counter!("ticketing_inventory_conflicts_total").increment(1);
}

/// Record the availability observed after a committed write.
pub fn record_tickets_available(event_id: EventId, available: u32) {
    metrics::gauge!("ticketing_tickets_available", "event_id" => event_id.to_string())
        .set(f64::from(available));
}

/// Record a cancellation.
pub fn record_cancellation(quantity: u32) {
    metrics::counter!("ticketing_cancellations_total").increment(1);
    tracing::debug!(quantity, "Recorded cancellation metric");
}

/// Record a notification outcome (`sent`, `failed` or `timeout`).
pub fn record_notification(status: &'static str) {
    metrics::counter!("ticketing_notifications_total", "status" => status).increment(1);
}

/// Record a compensation outcome (`restored`, `reverted` or `failed`).
pub fn record_compensation(outcome: &'static str) {
    metrics::counter!("ticketing_compensations_total", "outcome" => outcome).increment(1);
}
