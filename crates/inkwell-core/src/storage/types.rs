//! Core data types for the storage layer.
//!
//! Stored records only ever hold ciphertext tokens in `title` and `content`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entry as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEntry {
    /// Identifier assigned by the store
    pub id: Uuid,

    /// Encrypted title token
    pub title: String,

    /// Encrypted content token
    pub content: String,

    /// Creation or last update instant
    pub timestamp: DateTime<Utc>,
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct NewStoredEntry {
    pub title: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl NewStoredEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub(crate) fn into_stored(self, id: Uuid) -> StoredEntry {
        StoredEntry {
            id,
            title: self.title,
            content: self.content,
            timestamp: self.timestamp,
        }
    }
}

/// Filter for listing entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Start instant (inclusive)
    pub since: Option<DateTime<Utc>>,

    /// End instant (inclusive)
    pub until: Option<DateTime<Utc>>,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, date: DateTime<Utc>) -> Self {
        self.since = Some(date);
        self
    }

    pub fn until(mut self, date: DateTime<Utc>) -> Self {
        self.until = Some(date);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `timestamp` falls inside the since/until window.
    pub fn matches(&self, timestamp: &DateTime<Utc>) -> bool {
        self.since.map_or(true, |since| *timestamp >= since)
            && self.until.map_or(true, |until| *timestamp <= until)
    }
}
