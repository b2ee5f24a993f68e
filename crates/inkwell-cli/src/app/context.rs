//! Application context for the Inkwell CLI.
//!
//! Bundles the parsed arguments with handles that are created at most once
//! per invocation: resolved settings, the journal over its SQLite store, and
//! the feedback provider.

use std::io::IsTerminal;

use once_cell::unsync::OnceCell;

use inkwell_core::crypto::Codec;
use inkwell_core::feedback::FeedbackProvider;
use inkwell_core::storage::SqliteStore;
use inkwell_core::Journal;

use crate::cli::Cli;
use crate::errors::CliError;
use crate::feedback::provider_from_settings;

use super::resolver::{load_settings, missing_journal_error, Settings};

/// Application context that bundles CLI args with lazily opened handles.
pub struct AppContext<'a> {
    cli: &'a Cli,
    settings: OnceCell<Settings>,
    journal: OnceCell<Journal<SqliteStore>>,
    feedback: OnceCell<Box<dyn FeedbackProvider>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            settings: OnceCell::new(),
            journal: OnceCell::new(),
            feedback: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Whether prompts may be shown.
    pub fn interactive(&self, no_input: bool) -> bool {
        std::io::stdin().is_terminal() && !no_input
    }

    /// Get the effective settings, loading them lazily if needed.
    pub fn settings(&self) -> anyhow::Result<&Settings> {
        self.settings.get_or_try_init(|| load_settings(self.cli))
    }

    /// Shared journal handle, opened on first use.
    pub fn journal(&self) -> anyhow::Result<&Journal<SqliteStore>> {
        self.journal.get_or_try_init(|| self.open_journal())
    }

    /// Mutable journal handle, opened on first use.
    pub fn journal_mut(&mut self) -> anyhow::Result<&mut Journal<SqliteStore>> {
        if self.journal.get().is_none() {
            let journal = self.open_journal()?;
            let _ = self.journal.set(journal);
        }
        self.journal
            .get_mut()
            .ok_or_else(|| anyhow::anyhow!("Journal handle unavailable"))
    }

    /// Feedback provider, built on first use from the `[feedback]` settings.
    pub fn feedback_provider(&self) -> anyhow::Result<&dyn FeedbackProvider> {
        let provider = self
            .feedback
            .get_or_try_init(|| -> anyhow::Result<Box<dyn FeedbackProvider>> {
                Ok(provider_from_settings(&self.settings()?.feedback))
            })?;
        Ok(provider.as_ref())
    }

    fn open_journal(&self) -> anyhow::Result<Journal<SqliteStore>> {
        let settings = self.settings()?;
        if !settings.journal_path.exists() {
            return Err(missing_journal_error(&settings.journal_path).into());
        }
        let store = SqliteStore::open(&settings.journal_path)?;
        let codec = Codec::new(settings.kdf).map_err(CliError::from)?;
        Ok(Journal::new(store, codec))
    }
}
