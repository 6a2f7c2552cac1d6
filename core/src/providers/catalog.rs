//! Event catalog and availability storage.

use super::StoreFuture;
use crate::types::{Event, EventId, Version};

/// Event metadata lookup plus the compare-and-swap write on availability.
pub trait CatalogStore: Send + Sync {
    /// Load an event with its current availability and version.
    ///
    /// # Errors
    ///
    /// - [`StoreError::EventNotFound`](crate::StoreError::EventNotFound)
    /// - [`StoreError::Database`](crate::StoreError::Database)
    fn get_event(&self, event_id: EventId) -> StoreFuture<'_, Event>;

    /// List all events, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`](crate::StoreError::Database) on
    /// backend failure.
    fn list_events(&self) -> StoreFuture<'_, Vec<Event>>;

    /// Set `available_tickets` to `new_available` if the stored version still
    /// equals `expected_version`, bumping the version.
    ///
    /// Returns the new version. The write must be atomic with respect to
    /// every other `update_availability` on the same event.
    ///
    /// # Errors
    ///
    /// - [`StoreError::VersionMismatch`](crate::StoreError::VersionMismatch)
    ///   if another writer committed first
    /// - [`StoreError::CapacityViolation`](crate::StoreError::CapacityViolation)
    ///   if `new_available` exceeds the event's capacity
    /// - [`StoreError::EventNotFound`](crate::StoreError::EventNotFound)
    /// - [`StoreError::Database`](crate::StoreError::Database)
    fn update_availability(
        &self,
        event_id: EventId,
        new_available: u32,
        expected_version: Version,
    ) -> StoreFuture<'_, Version>;
}
