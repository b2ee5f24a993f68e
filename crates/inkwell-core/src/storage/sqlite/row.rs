//! Entry row type for database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{InkwellError, Result};
use crate::storage::types::StoredEntry;

/// Raw row data from the entries table, before parsing into domain types.
#[derive(Debug)]
pub struct EntryRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub timestamp: String,
}

impl EntryRow {
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            timestamp: row.get(3)?,
        })
    }
}

impl TryFrom<EntryRow> for StoredEntry {
    type Error = InkwellError;

    fn try_from(row: EntryRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| InkwellError::Storage(format!("Invalid entry UUID: {}", e)))?;
        let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
            .map_err(|e| InkwellError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(StoredEntry {
            id,
            title: row.title,
            content: row.content,
            timestamp,
        })
    }
}
