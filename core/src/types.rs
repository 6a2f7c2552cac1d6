//! Domain types for the ticket purchase core.
//!
//! Value objects (identifiers, money, versions, email addresses) and the three
//! entities the purchase transaction touches: [`Event`], [`Buyer`] and [`Ticket`].

use crate::error::ValidationError;
use crate::validation::is_valid_email;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a buyer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyerId(Uuid);

impl BuyerId {
    /// Creates a new random `BuyerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BuyerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BuyerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BuyerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-presentable ticket code (e.g. `TKT-7QK2M9XHRA`).
///
/// Codes are the external lookup key for tickets and are unique across every
/// ticket ever issued.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCode(String);

impl TicketCode {
    /// Wraps an existing code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Money Value Object (minor units to avoid floating point errors)
// ============================================================================

/// Money in integer minor units (e.g. cents), currency-agnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from minor units
    #[must_use]
    pub const fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    /// Creates a `Money` value from major units with overflow checking
    #[must_use]
    pub const fn checked_from_major_units(units: u64) -> Option<Self> {
        match units.checked_mul(100) {
            Some(minor) => Some(Self(minor)),
            None => None,
        }
    }

    /// Returns the amount in minor units
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Returns the whole major units (rounded down)
    #[must_use]
    pub const fn major_units(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.major_units(), self.0 % 100)
    }
}

// ============================================================================
// Version (optimistic concurrency)
// ============================================================================

/// Row version used for optimistic concurrency control on an event's
/// availability.
///
/// Every successful availability write bumps the version by one. A writer
/// commits only if the version it read is still current.
///
/// # Examples
///
/// ```
/// use ticketing_core::Version;
///
/// let v0 = Version::INITIAL;
/// assert_eq!(v0.next(), Version::new(1));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version of a freshly created event.
    pub const INITIAL: Self = Self(0);

    /// Create a new `Version` with the given value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the version number.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Get the next version (current + 1).
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Email
// ============================================================================

/// Case-normalized, syntactically valid email address.
///
/// Normalization trims surrounding whitespace and lower-cases the address, so
/// `" Wanjiru@Example.COM "` and `"wanjiru@example.com"` resolve to the same
/// buyer.
///
/// # Examples
///
/// ```
/// use ticketing_core::EmailAddress;
///
/// let email = EmailAddress::parse(" Wanjiru@Example.COM ").unwrap();
/// assert_eq!(email.as_str(), "wanjiru@example.com");
/// assert!(EmailAddress::parse("not-an-email").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalizes and validates a raw email address.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidEmail`] if the normalized address is
    /// not a syntactically valid email.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if is_valid_email(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(ValidationError::InvalidEmail(raw.to_string()))
        }
    }

    /// Returns the normalized address
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Domain Entities
// ============================================================================

/// A scheduled event with a finite ticket inventory.
///
/// `available_tickets` is the only mutable part and is owned by the event:
/// it only changes through a version-checked write, and always satisfies
/// `available_tickets <= total_tickets`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier
    pub id: EventId,
    /// Event name (e.g., "Blankets & Wine")
    pub name: String,
    /// Venue / location
    pub location: String,
    /// When the event starts
    pub starts_at: DateTime<Utc>,
    /// Price of a single ticket
    pub price: Money,
    /// Tickets still for sale
    pub available_tickets: u32,
    /// Capacity, fixed at creation
    pub total_tickets: u32,
    /// Optimistic concurrency marker for `available_tickets`
    pub version: Version,
}

impl Event {
    /// Creates a new event with its full capacity available.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositivePrice`] if `price` is zero.
    pub fn new(
        id: EventId,
        name: impl Into<String>,
        location: impl Into<String>,
        starts_at: DateTime<Utc>,
        price: Money,
        total_tickets: u32,
    ) -> Result<Self, ValidationError> {
        if price.is_zero() {
            return Err(ValidationError::NonPositivePrice);
        }

        Ok(Self {
            id,
            name: name.into(),
            location: location.into(),
            starts_at,
            price,
            available_tickets: total_tickets,
            total_tickets,
            version: Version::INITIAL,
        })
    }

    /// Checks if the requested quantity is available
    #[must_use]
    pub const fn has_available(&self, quantity: u32) -> bool {
        self.available_tickets >= quantity
    }

    /// Number of tickets currently sold (not available)
    #[must_use]
    pub const fn sold(&self) -> u32 {
        self.total_tickets.saturating_sub(self.available_tickets)
    }
}

/// A ticket buyer, resolved or created by email on first purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buyer {
    /// Unique buyer identifier
    pub id: BuyerId,
    /// Normalized, unique email address
    pub email: EmailAddress,
    /// Display name
    pub name: String,
    /// Contact phone
    pub phone: String,
    /// When the buyer record was created
    pub created_at: DateTime<Utc>,
}

/// Ticket lifecycle status.
///
/// ```text
/// ACTIVE ──► USED
///    │
///    └─────► CANCELLED   (restores inventory)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Valid for entry
    Active,
    /// Scanned at the entrance
    Used,
    /// Cancelled by the buyer; its quantity went back to the event
    Cancelled,
}

impl TicketStatus {
    /// Stable storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Used => "USED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses the storage representation
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Self::Active),
            "USED" => Some(Self::Used),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// USED and CANCELLED never transition again
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Used | Self::Cancelled)
    }

    /// Whether `self → next` is an allowed transition
    ///
    /// ACTIVE may become USED or CANCELLED; terminal states stay put.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        !self.is_terminal() && next.is_terminal()
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issued ticket.
///
/// `total_price` is frozen at purchase time; later price changes on the event
/// do not affect it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique code (external lookup key)
    pub code: TicketCode,
    /// Event the ticket admits to
    pub event_id: EventId,
    /// Buyer who purchased it
    pub buyer_id: BuyerId,
    /// Number of admissions
    pub quantity: u32,
    /// Event price × quantity at purchase time
    pub total_price: Money,
    /// When the purchase committed
    pub purchased_at: DateTime<Utc>,
    /// Current status
    pub status: TicketStatus,
}

impl Ticket {
    /// Issues a new ticket in the ACTIVE state
    #[must_use]
    pub const fn issue(
        code: TicketCode,
        event_id: EventId,
        buyer_id: BuyerId,
        quantity: u32,
        total_price: Money,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            event_id,
            buyer_id,
            quantity,
            total_price,
            purchased_at,
            status: TicketStatus::Active,
        }
    }
}

// ============================================================================
// Commands and notifications
// ============================================================================

/// Input of a purchase, supplied per call by the API layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Event to buy tickets for
    pub event_id: EventId,
    /// Buyer display name
    pub buyer_name: String,
    /// Buyer email (normalized during validation)
    pub buyer_email: String,
    /// Buyer contact phone
    pub buyer_phone: String,
    /// Number of tickets
    pub quantity: u32,
}

/// Everything a notifier needs to render a purchase receipt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// The committed ticket
    pub ticket: Ticket,
    /// Who bought it
    pub buyer: Buyer,
    /// Event snapshot the purchase was made against
    pub event: Event,
}
