//! SQLite entry store.
//!
//! One `entries` table holds the sealed tokens. The database file itself is
//! not encrypted; every sensitive column already is.

mod row;

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{InkwellError, Result};
use crate::storage::traits::EntryStore;
use crate::storage::types::{EntryFilter, NewStoredEntry, StoredEntry};

use row::EntryRow;

/// Schema version written to the `meta` table.
pub const SCHEMA_VERSION: &str = "1";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS entries (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        timestamp TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS entries_timestamp ON entries(timestamp);
";

/// SQLite-backed entry store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Connection,
}

impl SqliteStore {
    /// Create a new journal database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `InkwellError::Storage` if the file already exists.
    pub fn create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(InkwellError::Storage(format!(
                "Journal already exists at {}",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open an existing journal database.
    ///
    /// # Errors
    ///
    /// Returns `InkwellError::Storage` if the file is missing or was written
    /// by an unknown schema version.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InkwellError::Storage(format!(
                "No journal found at {}",
                path.display()
            )));
        }
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open a throwaway database that lives only in memory.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match version.as_deref() {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(InkwellError::Storage(format!(
                    "Unsupported journal schema version {}",
                    other
                )));
            }
        }

        tracing::debug!(path = ?path, "opened sqlite entry store");
        Ok(Self { path, conn })
    }

    /// Location of the database file, if it is file-backed.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of stored entries.
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| InkwellError::Storage("Negative entry count".to_string()))
    }
}

fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    // Fixed width keeps lexicographic order equal to chronological order
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl EntryStore for SqliteStore {
    fn create(&mut self, entry: &NewStoredEntry) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO entries (id, title, content, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                id.to_string(),
                entry.title,
                entry.content,
                format_timestamp(&entry.timestamp)
            ],
        )?;
        Ok(id)
    }

    fn update(&mut self, id: &Uuid, entry: &NewStoredEntry) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE entries SET title = ?1, content = ?2, timestamp = ?3 WHERE id = ?4",
            params![
                entry.title,
                entry.content,
                format_timestamp(&entry.timestamp),
                id.to_string()
            ],
        )?;
        if changed == 0 {
            return Err(InkwellError::NotFound(*id));
        }
        Ok(())
    }

    fn delete(&mut self, id: &Uuid) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
        if changed == 0 {
            return Err(InkwellError::NotFound(*id));
        }
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<StoredEntry>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, title, content, timestamp FROM entries WHERE id = ?1",
                params![id.to_string()],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(StoredEntry::try_from).transpose()
    }

    fn list(&self, filter: &EntryFilter) -> Result<Vec<StoredEntry>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(since) = filter.since {
            conditions.push("timestamp >= ?");
            params.push(Box::new(format_timestamp(&since)));
        }

        if let Some(until) = filter.until {
            conditions.push("timestamp <= ?");
            params.push(Box::new(format_timestamp(&until)));
        }

        let mut query = String::from("SELECT id, title, content, timestamp FROM entries");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY timestamp DESC, id ASC");

        if let Some(limit) = filter.limit {
            query.push_str(" LIMIT ?");
            params.push(Box::new(i64::try_from(limit).unwrap_or(i64::MAX)));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            EntryRow::from_row,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(StoredEntry::try_from(row?)?);
        }
        Ok(entries)
    }
}
