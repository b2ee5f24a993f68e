//! Storage layer for Inkwell.
//!
//! The journal talks to its document store through [`EntryStore`]. Two
//! backends ship with the crate:
//!
//! - [`SqliteStore`]: file-backed, used by the CLI
//! - [`MemoryStore`]: process-local, for tests and scratch sessions

pub mod memory;
pub mod sqlite;
pub mod traits;
pub mod types;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::EntryStore;
pub use types::{EntryFilter, NewStoredEntry, StoredEntry};
