//! # Inkwell Core
//!
//! Core library for Inkwell - a passphrase-encrypted personal journal.
//!
//! This crate provides the encryption codec, storage abstractions, and the
//! journal service independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: Password-derived authenticated encryption of entry text
//! - **storage**: Entry store trait and implementations (SQLite, memory)
//! - **journal**: Add / update / delete / list over an entry store
//! - **feedback**: Best-effort completion feedback with memoization

pub mod crypto;
pub mod error;
pub mod feedback;
pub mod journal;
pub mod storage;

pub use error::{InkwellError, Result};
pub use journal::{Journal, JournalEntry, Listing, SkipReason, SkippedEntry};
pub use storage::EntryStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
