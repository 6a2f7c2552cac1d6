//! Detached, time-bounded delivery of purchase confirmations.

use crate::metrics;
use std::sync::Arc;
use std::time::Duration;
use ticketing_core::Confirmation;
use ticketing_core::providers::{Notifier, NotifyError};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Default upper bound on a single delivery.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends confirmations on their own task so delivery never holds up, or
/// fails, a committed purchase.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl NotificationDispatcher {
    /// Creates a dispatcher bounded by `timeout` per delivery.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, timeout: Duration) -> Self {
        Self { notifier, timeout }
    }

    /// Spawns delivery of `confirmation`.
    ///
    /// The outcome is only logged and counted. The handle is returned for
    /// callers that want to wait on it (tests, graceful shutdown); dropping
    /// it does not cancel delivery.
    pub fn dispatch(&self, confirmation: Confirmation) -> JoinHandle<()> {
        let notifier = Arc::clone(&self.notifier);
        let timeout = self.timeout;
        let span = tracing::info_span!(
            "notify",
            ticket = %confirmation.ticket.code,
            to = %confirmation.buyer.email
        );

        tokio::spawn(
            async move {
                match tokio::time::timeout(timeout, notifier.send_confirmation(confirmation)).await {
                    Ok(Ok(())) => {
                        metrics::record_notification("sent");
                        tracing::debug!("Confirmation sent");
                    }
                    Ok(Err(error)) => {
                        metrics::record_notification("failed");
                        tracing::warn!(%error, "Confirmation delivery failed");
                    }
                    Err(_) => {
                        metrics::record_notification("timeout");
                        tracing::warn!(error = %NotifyError::Timeout(timeout), "Confirmation delivery failed");
                    }
                }
            }
            .instrument(span),
        )
    }
}
