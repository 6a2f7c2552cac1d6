//! SMTP notifier using Lettre.

use super::receipt::{render_html, render_subject};
use crate::config::SmtpConfig;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use ticketing_core::Confirmation;
use ticketing_core::providers::{Notifier, NotifyError, NotifyFuture};

/// Sends HTML purchase receipts through an SMTP relay.
///
/// Lettre's `SmtpTransport` is blocking, so each send runs on the blocking
/// pool. The dispatcher's timeout bounds the whole delivery.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Build a notifier from SMTP settings.
    ///
    /// # Errors
    ///
    /// - [`NotifyError::InvalidAddress`] if the sender address does not parse
    /// - [`NotifyError::Delivery`] if the relay cannot be configured
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let from = format!("{} <{}>", config.from_name, config.from_email)
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress(format!("Invalid from address: {e}")))?;

        let mut builder = SmtpTransport::relay(&config.host)
            .map_err(|e| NotifyError::Delivery(format!("SMTP relay error: {e}")))?
            .port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, confirmation: &Confirmation) -> Result<Message, NotifyError> {
        let to = confirmation
            .buyer
            .email
            .as_str()
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::InvalidAddress(format!("Invalid to address: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(render_subject(confirmation))
            .header(ContentType::TEXT_HTML)
            .body(render_html(confirmation))
            .map_err(|e| NotifyError::Delivery(format!("Failed to build email: {e}")))
    }
}

impl Notifier for SmtpNotifier {
    fn send_confirmation(&self, confirmation: Confirmation) -> NotifyFuture<'_> {
        Box::pin(async move {
            let email = self.build_message(&confirmation)?;
            let mailer = self.transport.clone();

            tokio::task::spawn_blocking(move || {
                mailer
                    .send(&email)
                    .map_err(|e| NotifyError::Delivery(format!("Failed to send email: {e}")))
            })
            .await
            .map_err(|e| NotifyError::Delivery(format!("Email task failed: {e}")))?
            .map(|_| ())
        })
    }
}
