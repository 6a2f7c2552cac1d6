//! Purchase confirmation delivery.

use crate::types::Confirmation;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Delivery failures. Never surfaced from a purchase; only logged and counted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Recipient address rejected by the transport.
    #[error("Invalid recipient address: {0}")]
    InvalidAddress(String),

    /// Transport failed to deliver.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Delivery did not finish in time.
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
}

/// Boxed future returned by [`Notifier`].
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<(), NotifyError>> + Send + 'a>>;

/// Sends purchase receipts (email, console, ...).
pub trait Notifier: Send + Sync {
    /// Deliver a receipt for a committed purchase.
    ///
    /// # Errors
    ///
    /// Returns a [`NotifyError`] if delivery fails.
    fn send_confirmation(&self, confirmation: Confirmation) -> NotifyFuture<'_>;
}
