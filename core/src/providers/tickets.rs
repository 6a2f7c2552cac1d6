//! Ticket storage.

use super::StoreFuture;
use crate::types::{BuyerId, Ticket, TicketCode, TicketStatus};

/// Durable tickets keyed by unique code.
pub trait TicketStore: Send + Sync {
    /// Persist a newly issued ticket.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateCode`](crate::StoreError::DuplicateCode) if
    ///   the code is already taken
    /// - [`StoreError::Database`](crate::StoreError::Database)
    fn save(&self, ticket: Ticket) -> StoreFuture<'_, ()>;

    /// Look up a ticket by code.
    ///
    /// # Errors
    ///
    /// - [`StoreError::TicketNotFound`](crate::StoreError::TicketNotFound)
    /// - [`StoreError::Database`](crate::StoreError::Database)
    fn find_by_code(&self, code: TicketCode) -> StoreFuture<'_, Ticket>;

    /// Move a ticket from `expected` to `new` atomically, returning the
    /// updated ticket.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StatusMismatch`](crate::StoreError::StatusMismatch)
    ///   if the stored status is not `expected`
    /// - [`StoreError::TicketNotFound`](crate::StoreError::TicketNotFound)
    /// - [`StoreError::Database`](crate::StoreError::Database)
    fn update_status(
        &self,
        code: TicketCode,
        expected: TicketStatus,
        new: TicketStatus,
    ) -> StoreFuture<'_, Ticket>;

    /// All tickets of a buyer, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) on
    /// backend failure.
    fn find_by_buyer(&self, buyer_id: BuyerId) -> StoreFuture<'_, Vec<Ticket>>;
}
