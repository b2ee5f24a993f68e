//! In-process entry store.

use std::collections::HashMap;

use uuid::Uuid;

use super::traits::EntryStore;
use super::types::{EntryFilter, NewStoredEntry, StoredEntry};
use crate::error::{InkwellError, Result};

/// Entry store backed by a `HashMap`. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<Uuid, StoredEntry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for MemoryStore {
    fn create(&mut self, entry: &NewStoredEntry) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.entries.insert(id, entry.clone().into_stored(id));
        Ok(id)
    }

    fn update(&mut self, id: &Uuid, entry: &NewStoredEntry) -> Result<()> {
        let slot = self
            .entries
            .get_mut(id)
            .ok_or(InkwellError::NotFound(*id))?;
        *slot = entry.clone().into_stored(*id);
        Ok(())
    }

    fn delete(&mut self, id: &Uuid) -> Result<()> {
        self.entries
            .remove(id)
            .map(|_| ())
            .ok_or(InkwellError::NotFound(*id))
    }

    fn get(&self, id: &Uuid) -> Result<Option<StoredEntry>> {
        Ok(self.entries.get(id).cloned())
    }

    fn list(&self, filter: &EntryFilter) -> Result<Vec<StoredEntry>> {
        let mut entries: Vec<StoredEntry> = self
            .entries
            .values()
            .filter(|entry| filter.matches(&entry.timestamp))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = filter.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}
