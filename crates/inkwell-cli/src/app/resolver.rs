//! Path and settings resolution.

use std::path::{Path, PathBuf};

use inkwell_core::crypto::KdfParams;

use crate::cli::Cli;
use crate::config::{default_config_path, default_journal_path, read_config, FeedbackSection};
use crate::constants::CONFIG_ENV;
use crate::errors::CliError;

/// Effective settings for one invocation: config file values with CLI and
/// environment overrides applied.
#[derive(Debug)]
pub struct Settings {
    pub journal_path: PathBuf,
    pub kdf: KdfParams,
    pub feedback: FeedbackSection,
}

pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load settings, falling back to defaults when no config file exists.
pub fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let config_path = resolve_config_path()?;
    let (config_journal, kdf, feedback) = if config_path.exists() {
        let config = read_config(&config_path)?;
        (
            Some(PathBuf::from(config.journal.path)),
            config.kdf,
            config.feedback,
        )
    } else {
        tracing::debug!(path = %config_path.display(), "no config file, using defaults");
        (None, KdfParams::default(), FeedbackSection::default())
    };

    let journal_path = match (cli.journal.as_ref(), config_journal) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(path)) => path,
        (None, None) => default_journal_path()?,
    };

    Ok(Settings {
        journal_path,
        kdf,
        feedback,
    })
}

pub fn missing_journal_error(path: &Path) -> CliError {
    CliError::not_found(
        format!("No journal found at {}", path.display()),
        "\nRun:\n  inkwell init\n\nOr specify a journal path:\n  INKWELL_PATH=/path/to/journal.db inkwell init",
    )
}
