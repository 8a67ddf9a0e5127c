//! Record store trait definition.
//!
//! The `RecordStore` trait is the seam between the vault service and the
//! place records live. The service only needs insert and lookup; records
//! are never updated or deleted.

use super::types::{Record, RecordId};
use crate::error::Result;

/// Storage interface for encrypted records.
///
/// All implementations must ensure:
/// - Ids are unique; an existing record is never overwritten
/// - Lookups have no side effects
pub trait RecordStore: Send {
    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::DuplicateId` if a record with the same id exists.
    fn put(&mut self, record: Record) -> Result<()>;

    /// Get a record by id.
    ///
    /// Returns `None` if no record has this id.
    fn get(&self, id: &RecordId) -> Option<&Record>;

    /// Number of stored records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
