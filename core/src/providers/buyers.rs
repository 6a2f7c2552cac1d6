//! Buyer directory.

use super::StoreFuture;
use crate::types::{Buyer, EmailAddress};

/// Resolve-or-create access to buyers, keyed by normalized email.
pub trait BuyerDirectory: Send + Sync {
    /// Find a buyer by email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) on
    /// backend failure.
    fn find_by_email(&self, email: EmailAddress) -> StoreFuture<'_, Option<Buyer>>;

    /// Insert `candidate` unless a buyer with the same email exists.
    ///
    /// Returns whichever buyer is stored afterwards: `candidate` if it was
    /// inserted, the existing record otherwise. Two concurrent calls with the
    /// same email must resolve to the same buyer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) on
    /// backend failure.
    fn create_if_absent(&self, candidate: Buyer) -> StoreFuture<'_, Buyer>;
}
