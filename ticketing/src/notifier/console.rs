//! Console notifier for development and deployments without SMTP.

use super::receipt::render_subject;
use ticketing_core::Confirmation;
use ticketing_core::providers::{Notifier, NotifyFuture};
use tracing::info;

/// Logs purchase receipts instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    /// Create a new console notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Notifier for ConsoleNotifier {
    fn send_confirmation(&self, confirmation: Confirmation) -> NotifyFuture<'_> {
        Box::pin(async move {
            let Confirmation {
                ticket,
                buyer,
                event,
            } = &confirmation;

            info!(
                to = %buyer.email,
                subject = %render_subject(&confirmation),
                code = %ticket.code,
                event = %event.name,
                starts_at = %event.starts_at,
                quantity = ticket.quantity,
                total = %ticket.total_price,
                "📧 Ticket confirmation (console delivery)"
            );
            Ok(())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ticketing_testing::fixtures;

    #[tokio::test]
    async fn test_console_delivery_always_succeeds() {
        let event = fixtures::event(10, 100);
        let buyer = fixtures::buyer("kofi@example.com");
        let ticket = fixtures::ticket("TKT-CONSOLE000", event.id, buyer.id, 1);

        ConsoleNotifier::new()
            .send_confirmation(Confirmation {
                ticket,
                buyer,
                event,
            })
            .await
            .unwrap();
    }
}
