use crate::mocks::test_clock;
use ticketing_core::environment::Clock;
use ticketing_core::{
    Buyer, BuyerId, EmailAddress, Event, EventId, Money, PurchaseRequest, Ticket, TicketCode,
};

/// An event with `total` tickets at `price_minor_units` each, starting at
/// the test clock's time.
///
/// # Panics
///
/// Panics if `price_minor_units` is zero.
#[must_use]
#[allow(clippy::expect_used)]
pub fn event(total: u32, price_minor_units: u64) -> Event {
    Event::new(
        EventId::new(),
        "Nairobi Jazz Night",
        "Carnivore Grounds, Nairobi",
        test_clock().now(),
        Money::from_minor_units(price_minor_units),
        total,
    )
    .expect("fixture price must be positive")
}

/// A buyer with the given email.
///
/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
#[allow(clippy::expect_used)]
pub fn buyer(email: &str) -> Buyer {
    Buyer {
        id: BuyerId::new(),
        email: EmailAddress::parse(email).expect("fixture email must be valid"),
        name: "Test Buyer".to_string(),
        phone: "+254700000000".to_string(),
        created_at: test_clock().now(),
    }
}

/// An ACTIVE ticket priced at 100 minor units per admission.
#[must_use]
pub fn ticket(code: &str, event_id: EventId, buyer_id: BuyerId, quantity: u32) -> Ticket {
    Ticket::issue(
        TicketCode::new(code),
        event_id,
        buyer_id,
        quantity,
        Money::from_minor_units(100 * u64::from(quantity)),
        test_clock().now(),
    )
}

/// A purchase request for `quantity` tickets of `event_id`.
#[must_use]
pub fn purchase_request(event_id: EventId, email: &str, quantity: u32) -> PurchaseRequest {
    PurchaseRequest {
        event_id,
        buyer_name: "Wanjiku Kamau".to_string(),
        buyer_email: email.to_string(),
        buyer_phone: "+254711000000".to_string(),
        quantity,
    }
}
