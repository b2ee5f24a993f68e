//! Passphrase acquisition.
//!
//! The passphrase comes from `INKWELL_PASSPHRASE` or a hidden prompt. It is
//! held in memory for the current invocation only.

use dialoguer::Password;
use inkwell_core::crypto::{is_weak_passphrase, validate_passphrase};

use crate::constants::PASSPHRASE_ENV;
use crate::errors::CliError;

fn passphrase_from_env() -> Option<String> {
    std::env::var(PASSPHRASE_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Read the passphrase used to open existing entries.
pub fn read_passphrase(interactive: bool) -> anyhow::Result<String> {
    if let Some(value) = passphrase_from_env() {
        return Ok(value);
    }
    if !interactive {
        return Err(CliError::invalid_input(format!(
            "No passphrase provided and no TTY available. Set {}.",
            PASSPHRASE_ENV
        ))
        .into());
    }
    let passphrase = Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?;
    validate_passphrase(&passphrase).map_err(CliError::from)?;
    Ok(passphrase)
}

/// Read a passphrase for sealing new text, with confirmation when prompting.
pub fn read_new_passphrase(interactive: bool, quiet: bool) -> anyhow::Result<String> {
    let passphrase = match passphrase_from_env() {
        Some(value) => value,
        None if interactive => Password::new()
            .with_prompt("Passphrase")
            .with_confirmation("Confirm passphrase", "Passphrases do not match")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))?,
        None => {
            return Err(CliError::invalid_input(format!(
                "No passphrase provided and no TTY available. Set {}.",
                PASSPHRASE_ENV
            ))
            .into())
        }
    };
    validate_passphrase(&passphrase).map_err(CliError::from)?;
    if is_weak_passphrase(&passphrase) && !quiet {
        eprintln!("Warning: short passphrases are easy to guess; consider 8 or more characters.");
    }
    Ok(passphrase)
}
