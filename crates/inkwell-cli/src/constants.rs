//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, journal, entry).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (wrong passphrase, tampered entry).
    pub const AUTH_FAILED: i32 = 5;
}

/// Entries shown by `list` when no window or limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Environment variable holding the passphrase for non-interactive use.
pub const PASSPHRASE_ENV: &str = "INKWELL_PASSPHRASE";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "INKWELL_CONFIG";
