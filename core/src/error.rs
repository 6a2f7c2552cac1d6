//! Error taxonomy for the purchase core.
//!
//! Three layers:
//!
//! - [`ValidationError`]: request input rejected before any I/O
//! - [`StoreError`]: what a storage provider reports
//! - [`TicketingError`]: what a coordinator operation reports to its caller

use crate::types::{EventId, TicketCode, TicketStatus, Version};
use thiserror::Error;

/// Result type alias for coordinator operations.
pub type Result<T> = std::result::Result<T, TicketingError>;

/// Request input that fails validation. Always detected before any state is
/// touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Quantity must be at least one.
    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    /// Quantity exceeds the per-purchase maximum.
    #[error("Quantity {requested} exceeds the per-purchase maximum of {max}")]
    QuantityTooLarge {
        /// Requested quantity
        requested: u32,
        /// Configured maximum
        max: u32,
    },

    /// Buyer name is blank.
    #[error("Buyer name is required")]
    MissingName,

    /// Email address is not syntactically valid.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// `price × quantity` does not fit in the money representation.
    #[error("Total price overflows for quantity {quantity}")]
    PriceOverflow {
        /// Requested quantity
        quantity: u32,
    },

    /// Event price must be strictly positive.
    #[error("Event price must be greater than zero")]
    NonPositivePrice,
}

/// Errors reported by storage providers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No event with this id.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// No ticket with this code.
    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketCode),

    /// The event's version moved since it was read.
    #[error("Version mismatch for event {event_id}: expected {expected}, actual {actual}")]
    VersionMismatch {
        /// Event whose write was rejected
        event_id: EventId,
        /// Version the writer read
        expected: Version,
        /// Version currently stored
        actual: Version,
    },

    /// A ticket with this code already exists.
    #[error("Duplicate ticket code: {0}")]
    DuplicateCode(TicketCode),

    /// The ticket's status is not the one the conditional update expected.
    #[error("Status mismatch for ticket {code}: expected {expected}, actual {actual}")]
    StatusMismatch {
        /// Ticket code
        code: TicketCode,
        /// Status the writer expected
        expected: TicketStatus,
        /// Status currently stored
        actual: TicketStatus,
    },

    /// The write would break `0 <= available <= total`.
    #[error("Availability {available} out of range for event {event_id} (total {total})")]
    CapacityViolation {
        /// Event whose write was rejected
        event_id: EventId,
        /// Requested availability
        available: u32,
        /// Event capacity
        total: u32,
    },

    /// Backend failure (connection, query, lock poisoning).
    #[error("Database error: {0}")]
    Database(String),
}

/// Errors returned by purchase, cancel and lookup operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TicketingError {
    /// The request was rejected before any I/O.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No event with this id.
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// No ticket with this code.
    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketCode),

    /// Not enough tickets left. Never retried.
    #[error("Insufficient inventory for event {event_id}: requested {requested}, available {available}")]
    InsufficientInventory {
        /// Event
        event_id: EventId,
        /// Requested quantity
        requested: u32,
        /// Tickets available when checked
        available: u32,
    },

    /// Version conflicts persisted past the retry bound.
    #[error("Concurrency conflict on event {event_id} after {attempts} attempts")]
    ConcurrencyConflict {
        /// Event
        event_id: EventId,
        /// Attempts made
        attempts: u32,
    },

    /// The ticket is not in a state that allows the operation.
    #[error("Ticket {code} is {status}")]
    InvalidState {
        /// Ticket code
        code: TicketCode,
        /// Current status
        status: TicketStatus,
    },

    /// Restoring the quantity would push availability above capacity.
    #[error("Cannot restore {requested} tickets to event {event_id}: {available} of {total} available")]
    CapacityExceeded {
        /// Event
        event_id: EventId,
        /// Quantity being restored
        requested: u32,
        /// Tickets available when checked
        available: u32,
        /// Event capacity
        total: u32,
    },

    /// The generated ticket code collided with an existing one.
    #[error("Duplicate ticket code: {0}")]
    DuplicateCode(TicketCode),

    /// Storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TicketingError {
    /// Returns `true` if retrying the same request may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ticketing_core::{EventId, TicketingError};
    /// let err = TicketingError::ConcurrencyConflict { event_id: EventId::new(), attempts: 4 };
    /// assert!(err.is_transient());
    /// assert!(!TicketingError::Storage("down".into()).is_transient());
    /// ```
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict { .. } | Self::DuplicateCode(_)
        )
    }

    /// Returns `true` if this error is due to the caller's request.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::EventNotFound(_)
                | Self::TicketNotFound(_)
                | Self::InsufficientInventory { .. }
                | Self::InvalidState { .. }
        )
    }
}

impl From<StoreError> for TicketingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EventNotFound(id) => Self::EventNotFound(id),
            StoreError::TicketNotFound(code) => Self::TicketNotFound(code),
            StoreError::VersionMismatch { event_id, .. } => Self::ConcurrencyConflict {
                event_id,
                attempts: 1,
            },
            StoreError::DuplicateCode(code) => Self::DuplicateCode(code),
            StoreError::StatusMismatch { code, actual, .. } => Self::InvalidState {
                code,
                status: actual,
            },
            StoreError::CapacityViolation { .. } | StoreError::Database(_) => {
                Self::Storage(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mismatch_reports_actual_status() {
        let code = TicketCode::new("TKT-AAAA");
        let err: TicketingError = StoreError::StatusMismatch {
            code: code.clone(),
            expected: TicketStatus::Active,
            actual: TicketStatus::Cancelled,
        }
        .into();

        assert_eq!(
            err,
            TicketingError::InvalidState {
                code,
                status: TicketStatus::Cancelled
            }
        );
        assert!(err.is_user_error());
        assert!(!err.is_transient());
    }

    #[test]
    fn duplicate_code_is_transient() {
        let err: TicketingError = StoreError::DuplicateCode(TicketCode::new("TKT-DUP")).into();
        assert!(err.is_transient());
        assert!(!err.is_user_error());
    }

    #[test]
    fn capacity_violation_is_a_storage_fault() {
        let err: TicketingError = StoreError::CapacityViolation {
            event_id: EventId::new(),
            available: 11,
            total: 10,
        }
        .into();
        assert!(matches!(err, TicketingError::Storage(_)));
    }
}
