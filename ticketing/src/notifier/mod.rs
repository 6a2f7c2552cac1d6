//! Confirmation delivery.
//!
//! - [`ConsoleNotifier`]: logs the receipt (development, or no SMTP configured)
//! - [`SmtpNotifier`]: sends an HTML receipt through an SMTP relay

mod console;
mod receipt;
mod smtp;

pub use console::ConsoleNotifier;
pub use receipt::{render_html, render_subject};
pub use smtp::SmtpNotifier;
