//! Error types for Inkwell core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer will map these
//! to user-friendly messages.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for Inkwell operations.
pub type Result<T> = std::result::Result<T, InkwellError>;

/// Core error type for Inkwell operations.
#[derive(Debug, Error)]
pub enum InkwellError {
    /// Wrong passphrase, or a token whose integrity check failed
    #[error("Authentication failed: incorrect passphrase or corrupted ciphertext")]
    Authentication,

    /// Rejected input: empty passphrase, malformed token, bad parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entry not found by ID
    #[error("Entry not found: {0}")]
    NotFound(Uuid),

    /// Internal cipher or key derivation failure
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Completion service failure
    #[error("Feedback error: {0}")]
    Feedback(String),
}

impl InkwellError {
    /// True when the error is an integrity or passphrase failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, InkwellError::Authentication)
    }

    /// True for the failures a single stored token can cause on decrypt.
    ///
    /// Batch listings skip entries failing this way and abort on anything else.
    pub fn is_decrypt_failure(&self) -> bool {
        matches!(
            self,
            InkwellError::Authentication | InkwellError::Validation(_)
        )
    }
}

impl From<std::io::Error> for InkwellError {
    fn from(err: std::io::Error) -> Self {
        InkwellError::Storage(err.to_string())
    }
}
