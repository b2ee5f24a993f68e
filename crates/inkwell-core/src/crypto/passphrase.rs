//! Passphrase validation.
//!
//! The codec only insists that a passphrase carries some content. Length
//! guidance is advisory and left to the front end.

use crate::error::{InkwellError, Result};

/// Passphrases shorter than this draw a warning from the CLI.
pub const RECOMMENDED_MIN_LENGTH: usize = 8;

/// Validate that a passphrase can be used for key derivation.
///
/// # Requirements
///
/// - Not empty or only whitespace
///
/// # Examples
///
/// ```
/// use inkwell_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("correct-horse").is_ok());
/// assert!(validate_passphrase("   ").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(InkwellError::Validation(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Whether a passphrase falls below the recommended length.
pub fn is_weak_passphrase(passphrase: &str) -> bool {
    passphrase.chars().count() < RECOMMENDED_MIN_LENGTH
}
