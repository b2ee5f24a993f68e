//! Entry store trait definition.
//!
//! The `EntryStore` trait is the document store collaborator: create,
//! update, delete by id, and list newest first. Implementations never see
//! plaintext; the journal service hands them sealed tokens only.

use uuid::Uuid;

use super::types::{EntryFilter, NewStoredEntry, StoredEntry};
use crate::error::Result;

/// Document store interface for journal entries.
///
/// All implementations must ensure:
/// - Identifiers are assigned by the store (UUID v4)
/// - `list` returns entries in reverse chronological order
/// - `title` and `content` are persisted verbatim
pub trait EntryStore: Send {
    /// Insert a new entry.
    ///
    /// # Returns
    ///
    /// Returns the UUID assigned to the entry.
    fn create(&mut self, entry: &NewStoredEntry) -> Result<Uuid>;

    /// Replace both text fields and the timestamp of an entry.
    ///
    /// # Errors
    ///
    /// Returns `InkwellError::NotFound` if no entry has this id.
    fn update(&mut self, id: &Uuid, entry: &NewStoredEntry) -> Result<()>;

    /// Delete an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `InkwellError::NotFound` if no entry has this id.
    fn delete(&mut self, id: &Uuid) -> Result<()>;

    /// Get an entry by id.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(entry))` if found, `Ok(None)` if not found.
    fn get(&self, id: &Uuid) -> Result<Option<StoredEntry>>;

    /// List entries matching the filter, newest first.
    fn list(&self, filter: &EntryFilter) -> Result<Vec<StoredEntry>>;
}
