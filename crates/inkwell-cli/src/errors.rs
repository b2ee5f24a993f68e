//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes so scripts can tell a missing
//! entry from a wrong passphrase.

use std::fmt;

use inkwell_core::InkwellError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, journal, entry)
    NotFound { message: String, hint: String },

    /// Authentication failed (wrong passphrase, tampered entry)
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

impl From<InkwellError> for CliError {
    fn from(err: InkwellError) -> Self {
        match err {
            InkwellError::NotFound(id) => CliError::not_found(
                format!("Entry not found: {}", id),
                "Hint: Run `inkwell list` to find entry IDs.",
            ),
            InkwellError::Authentication => CliError::auth_failed_with_hint(
                "Incorrect passphrase or corrupted entry.",
                "Hint: Entries only open with the passphrase they were written with.",
            ),
            InkwellError::Validation(message) => CliError::invalid_input(message),
            other => CliError::invalid_input(other.to_string()),
        }
    }
}

/// Attach CLI hints to user-facing core errors; others pass through unchanged.
pub fn with_hint(err: InkwellError) -> anyhow::Error {
    match err {
        InkwellError::NotFound(_) | InkwellError::Authentication | InkwellError::Validation(_) => {
            CliError::from(err).into()
        }
        other => other.into(),
    }
}

/// Pick the process exit code for an error returned from a command.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<InkwellError>() {
        Some(InkwellError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(InkwellError::Authentication) => exit_codes::AUTH_FAILED,
        Some(InkwellError::Validation(_)) => exit_codes::INVALID_INPUT,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_core_errors_map_to_exit_codes() {
        let not_found = anyhow::Error::new(InkwellError::NotFound(Uuid::nil()));
        assert_eq!(exit_code_for(&not_found), exit_codes::NOT_FOUND);

        let auth = anyhow::Error::new(InkwellError::Authentication);
        assert_eq!(exit_code_for(&auth), exit_codes::AUTH_FAILED);

        let storage = anyhow::Error::new(InkwellError::Storage("disk".into()));
        assert_eq!(exit_code_for(&storage), 1);
    }

    #[test]
    fn test_cli_error_from_core() {
        let err = CliError::from(InkwellError::Authentication);
        assert_eq!(err.exit_code(), exit_codes::AUTH_FAILED);
        assert!(err.to_string().contains("Incorrect passphrase"));

        let err = CliError::from(InkwellError::NotFound(Uuid::nil()));
        assert!(err.to_string().contains("inkwell list"));
    }

    #[test]
    fn test_with_hint_keeps_storage_errors_generic() {
        let err = with_hint(InkwellError::Storage("disk full".into()));
        assert_eq!(exit_code_for(&err), 1);

        let err = with_hint(InkwellError::Authentication);
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);
        assert!(err.to_string().contains("Hint:"));
    }
}
