//! Receipt rendering shared by the notifiers.

use ticketing_core::Confirmation;

/// Subject line of a purchase receipt.
#[must_use]
pub fn render_subject(confirmation: &Confirmation) -> String {
    format!("Ticket Confirmation - {}", confirmation.event.name)
}

/// HTML body of a purchase receipt.
///
/// Buyer- and event-supplied text is escaped.
#[must_use]
pub fn render_html(confirmation: &Confirmation) -> String {
    let Confirmation {
        ticket,
        buyer,
        event,
    } = confirmation;

    let buyer_name = escape(&buyer.name);
    let event_name = escape(&event.name);
    let location = escape(&event.location);
    let code = escape(ticket.code.as_str());
    let starts_at = event.starts_at.format("%A, %B %d, %Y at %I:%M %p UTC");
    let quantity = ticket.quantity;
    let total = ticket.total_price;
    let status = ticket.status;

    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Ticket Confirmation</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: #2563eb;">Ticket Confirmation</h2>
        <p>Dear {buyer_name},</p>
        <p>Thank you for your purchase! Your ticket has been confirmed.</p>
        <p style="margin: 30px 0; padding: 15px; border: 2px dashed #2563eb; text-align: center; font-size: 24px; font-weight: bold;">
            {code}
        </p>
        <h3>Event Details</h3>
        <table style="width: 100%; border-collapse: collapse;">
            <tr><td><strong>Event:</strong></td><td>{event_name}</td></tr>
            <tr><td><strong>Location:</strong></td><td>{location}</td></tr>
            <tr><td><strong>Date &amp; Time:</strong></td><td>{starts_at}</td></tr>
        </table>
        <h3>Ticket Information</h3>
        <table style="width: 100%; border-collapse: collapse;">
            <tr><td><strong>Quantity:</strong></td><td>{quantity} ticket(s)</td></tr>
            <tr><td><strong>Total Paid:</strong></td><td>{total}</td></tr>
            <tr><td><strong>Status:</strong></td><td>{status}</td></tr>
        </table>
        <p style="color: #666; font-size: 14px;">
            Present this ticket code at the event entrance. Keep this email for your records.
        </p>
        <p style="color: #666; font-size: 12px; margin-top: 40px;">
            This is an automated email. Please do not reply.
        </p>
    </div>
</body>
</html>
        "#
    )
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
