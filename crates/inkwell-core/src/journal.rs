//! Journal service.
//!
//! Glues the codec to an [`EntryStore`]: entries go in sealed and come out
//! decrypted. Listing decrypts each entry independently and sets aside the
//! ones the supplied passphrase cannot open instead of failing the whole
//! listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::crypto::{Codec, KeyCache};
use crate::error::{InkwellError, Result};
use crate::storage::{EntryFilter, EntryStore, NewStoredEntry, StoredEntry};

/// A decrypted entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalEntry {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Why an entry was left out of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Sealed under another passphrase, or tampered with
    Authentication,
    /// Stored token could not be parsed
    Malformed,
}

/// An entry a listing could not decrypt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub id: Uuid,
    pub reason: SkipReason,
}

/// Result of decrypting a batch of stored entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Listing {
    /// Decrypted entries, newest first
    pub entries: Vec<JournalEntry>,
    /// Entries that could not be decrypted under the supplied passphrase
    pub skipped: Vec<SkippedEntry>,
}

impl Listing {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Encrypted journal over any entry store.
pub struct Journal<S: EntryStore> {
    store: S,
    codec: Codec,
}

impl<S: EntryStore> Journal<S> {
    pub fn new(store: S, codec: Codec) -> Self {
        Self { store, codec }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Seal and store a new entry stamped with the current time.
    pub fn add_entry(&mut self, title: &str, content: &str, passphrase: &str) -> Result<Uuid> {
        let sealed = self.codec.seal_entry(title, content, passphrase)?;
        let id = self
            .store
            .create(&NewStoredEntry::new(sealed.title, sealed.content))?;
        tracing::debug!(%id, "added entry");
        Ok(id)
    }

    /// Replace an entry's title and content and refresh its timestamp.
    ///
    /// The existing entry must decrypt under `passphrase`; an entry sealed
    /// under another passphrase is never overwritten.
    ///
    /// # Errors
    ///
    /// - `InkwellError::NotFound` if the entry does not exist
    /// - `InkwellError::Authentication` if `passphrase` does not open it
    pub fn update_entry(
        &mut self,
        id: &Uuid,
        title: &str,
        content: &str,
        passphrase: &str,
    ) -> Result<()> {
        self.get_entry(id, passphrase)?;
        let sealed = self.codec.seal_entry(title, content, passphrase)?;
        self.store
            .update(id, &NewStoredEntry::new(sealed.title, sealed.content))?;
        tracing::debug!(%id, "updated entry");
        Ok(())
    }

    /// Delete an entry by id.
    pub fn delete_entry(&mut self, id: &Uuid) -> Result<()> {
        self.store.delete(id)?;
        tracing::debug!(%id, "deleted entry");
        Ok(())
    }

    /// Fetch and decrypt one entry. Failures are returned, not skipped.
    pub fn get_entry(&self, id: &Uuid, passphrase: &str) -> Result<JournalEntry> {
        let stored = self.store.get(id)?.ok_or(InkwellError::NotFound(*id))?;
        let mut cache = KeyCache::new(passphrase)?;
        self.open_entry(stored, &mut cache)
    }

    /// List entries newest first, decrypting each under `passphrase`.
    ///
    /// Entries that fail to decrypt (wrong passphrase, tampered or malformed
    /// token) are reported in [`Listing::skipped`]. Storage errors and
    /// internal crypto failures abort the listing.
    pub fn list_entries(&self, passphrase: &str, filter: &EntryFilter) -> Result<Listing> {
        let mut cache = KeyCache::new(passphrase)?;
        let mut listing = Listing::default();

        for stored in self.store.list(filter)? {
            let id = stored.id;
            match self.open_entry(stored, &mut cache) {
                Ok(entry) => listing.entries.push(entry),
                Err(err) if err.is_decrypt_failure() => {
                    let reason = if err.is_authentication() {
                        SkipReason::Authentication
                    } else {
                        SkipReason::Malformed
                    };
                    tracing::debug!(%id, ?reason, "skipping entry");
                    listing.skipped.push(SkippedEntry { id, reason });
                }
                Err(err) => return Err(err),
            }
        }

        if !listing.skipped.is_empty() {
            tracing::warn!(
                skipped = listing.skipped.len(),
                "some entries could not be decrypted with the supplied passphrase"
            );
        }
        tracing::debug!(
            entries = listing.entries.len(),
            derivations = cache.derivations(),
            "listed entries"
        );
        Ok(listing)
    }

    fn open_entry(&self, stored: StoredEntry, cache: &mut KeyCache<'_>) -> Result<JournalEntry> {
        let title = self.codec.decrypt_cached(&stored.title, cache)?;
        let content = self.codec.decrypt_cached(&stored.content, cache)?;
        Ok(JournalEntry {
            id: stored.id,
            title,
            content,
            timestamp: stored.timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::PBKDF2_MIN_ITERATIONS;
    use crate::crypto::KdfParams;
    use crate::storage::MemoryStore;

    const PASS: &str = "correct-horse";

    fn journal() -> Journal<MemoryStore> {
        let codec = Codec::new(KdfParams::pbkdf2(PBKDF2_MIN_ITERATIONS)).unwrap();
        Journal::new(MemoryStore::new(), codec)
    }

    #[test]
    fn test_add_then_get() {
        let mut journal = journal();
        let id = journal.add_entry("Day one", "Today was hard.", PASS).unwrap();

        let entry = journal.get_entry(&id, PASS).unwrap();
        assert_eq!(entry.title, "Day one");
        assert_eq!(entry.content, "Today was hard.");
    }

    #[test]
    fn test_store_never_sees_plaintext() {
        let mut journal = journal();
        let id = journal.add_entry("Day one", "Today was hard.", PASS).unwrap();

        let stored = journal.store().get(&id).unwrap().unwrap();
        assert!(!stored.title.contains("Day one"));
        assert!(!stored.content.contains("Today was hard."));
    }

    #[test]
    fn test_get_with_wrong_passphrase_surfaces_error() {
        let mut journal = journal();
        let id = journal.add_entry("t", "c", PASS).unwrap();
        assert!(matches!(
            journal.get_entry(&id, "wrong-pass"),
            Err(InkwellError::Authentication)
        ));
        assert!(matches!(
            journal.get_entry(&Uuid::new_v4(), PASS),
            Err(InkwellError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_skips_foreign_entry() {
        let mut journal = journal();
        journal.add_entry("one", "1", PASS).unwrap();
        let foreign = journal.add_entry("two", "2", "other-passphrase").unwrap();
        journal.add_entry("three", "3", PASS).unwrap();

        let listing = journal.list_entries(PASS, &EntryFilter::new()).unwrap();
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.skipped_count(), 1);
        assert_eq!(
            listing.skipped[0],
            SkippedEntry {
                id: foreign,
                reason: SkipReason::Authentication
            }
        );
    }

    #[test]
    fn test_list_with_wrong_passphrase_is_empty_not_error() {
        let mut journal = journal();
        journal.add_entry("one", "1", PASS).unwrap();
        journal.add_entry("two", "2", PASS).unwrap();

        let listing = journal.list_entries("wrong-pass", &EntryFilter::new()).unwrap();
        assert!(listing.entries.is_empty());
        assert_eq!(listing.skipped_count(), 2);
    }

    #[test]
    fn test_list_reports_malformed_token() {
        let mut journal = journal();
        journal.add_entry("good", "entry", PASS).unwrap();
        let mut store = journal.into_store();
        let bad = store
            .create(&NewStoredEntry::new("plaintext title", "plaintext body"))
            .unwrap();
        let codec = Codec::new(KdfParams::pbkdf2(PBKDF2_MIN_ITERATIONS)).unwrap();
        let journal = Journal::new(store, codec);

        let listing = journal.list_entries(PASS, &EntryFilter::new()).unwrap();
        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.skipped[0].id, bad);
        assert_eq!(listing.skipped[0].reason, SkipReason::Malformed);
    }

    #[test]
    fn test_list_empty_passphrase_is_error() {
        let journal = journal();
        assert!(matches!(
            journal.list_entries("", &EntryFilter::new()),
            Err(InkwellError::Validation(_))
        ));
    }

    #[test]
    fn test_update_reseals_and_refreshes_timestamp() {
        let mut journal = journal();
        let id = journal.add_entry("draft", "first words", PASS).unwrap();
        let before = journal.store().get(&id).unwrap().unwrap();

        journal.update_entry(&id, "final", "better words", PASS).unwrap();
        let after = journal.store().get(&id).unwrap().unwrap();

        assert_ne!(before.title, after.title);
        assert!(after.timestamp >= before.timestamp);
        let entry = journal.get_entry(&id, PASS).unwrap();
        assert_eq!(entry.title, "final");
        assert_eq!(entry.content, "better words");
    }

    #[test]
    fn test_update_refuses_foreign_entry() {
        let mut journal = journal();
        let id = journal.add_entry("mine", "secret", "other-passphrase").unwrap();

        let result = journal.update_entry(&id, "clobbered", "oops", PASS);
        assert!(matches!(result, Err(InkwellError::Authentication)));
        assert_eq!(
            journal.get_entry(&id, "other-passphrase").unwrap().title,
            "mine"
        );
    }

    #[test]
    fn test_update_missing_entry() {
        let mut journal = journal();
        let result = journal.update_entry(&Uuid::new_v4(), "t", "c", PASS);
        assert!(matches!(result, Err(InkwellError::NotFound(_))));
    }

    #[test]
    fn test_delete_entry() {
        let mut journal = journal();
        let id = journal.add_entry("t", "c", PASS).unwrap();
        journal.delete_entry(&id).unwrap();
        assert!(matches!(
            journal.delete_entry(&id),
            Err(InkwellError::NotFound(_))
        ));
        let listing = journal.list_entries(PASS, &EntryFilter::new()).unwrap();
        assert!(listing.entries.is_empty());
    }
}
