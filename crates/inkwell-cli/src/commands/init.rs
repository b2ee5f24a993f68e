use std::path::{Path, PathBuf};

use inkwell_core::crypto::kdf::{
    ARGON2_DEFAULT_MEMORY_KIB, ARGON2_DEFAULT_PARALLELISM, PBKDF2_DEFAULT_ITERATIONS,
};
use inkwell_core::crypto::KdfParams;
use inkwell_core::storage::SqliteStore;

use crate::app::{resolve_config_path, AppContext};
use crate::cli::{InitArgs, KdfChoice};
use crate::config::{default_journal_path, write_config, InkwellConfig};
use crate::errors::{with_hint, CliError};

fn kdf_from_args(args: &InitArgs) -> KdfParams {
    match args.kdf.unwrap_or(KdfChoice::Pbkdf2Sha256) {
        KdfChoice::Pbkdf2Sha256 => {
            KdfParams::pbkdf2(args.iterations.unwrap_or(PBKDF2_DEFAULT_ITERATIONS))
        }
        KdfChoice::Argon2id => match args.iterations {
            Some(iterations) => KdfParams::Argon2id {
                memory_kib: ARGON2_DEFAULT_MEMORY_KIB,
                iterations,
                parallelism: ARGON2_DEFAULT_PARALLELISM,
            },
            None => KdfParams::argon2id(),
        },
    }
}

/// Create the journal, then the config. A failed config write removes the
/// journal again so `init` can be retried.
fn create_journal_and_config(
    journal_path: &Path,
    config_path: &Path,
    config: &InkwellConfig,
) -> anyhow::Result<()> {
    if journal_path.exists() {
        return Err(CliError::invalid_input(format!(
            "Journal already exists at {}",
            journal_path.display()
        ))
        .into());
    }

    drop(SqliteStore::create(journal_path).map_err(with_hint)?);
    if let Err(err) = write_config(config_path, config) {
        if let Err(cleanup) = std::fs::remove_file(journal_path) {
            tracing::warn!(
                path = %journal_path.display(),
                error = %cleanup,
                "failed to remove journal after config write failure"
            );
        }
        return Err(err);
    }
    Ok(())
}

pub fn handle_init(ctx: &AppContext, args: &InitArgs) -> anyhow::Result<()> {
    let journal_path = match args.path.as_ref().or(ctx.cli().journal.as_ref()) {
        Some(path) => PathBuf::from(path),
        None => default_journal_path()?,
    };
    let config_path = match args.config_path.as_ref() {
        Some(path) => PathBuf::from(path),
        None => resolve_config_path()?,
    };

    if config_path.exists() {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Remove it or pass --config-path to write elsewhere.",
            config_path.display()
        ))
        .into());
    }

    let kdf = kdf_from_args(args);
    kdf.validate().map_err(with_hint)?;

    let config = InkwellConfig::new(journal_path.clone(), kdf, args.feedback);
    create_journal_and_config(&journal_path, &config_path, &config)?;
    tracing::debug!(
        journal = %journal_path.display(),
        config = %config_path.display(),
        kdf = %kdf.algorithm(),
        "initialized journal"
    );

    if !ctx.quiet() {
        println!("Initialized new journal at {}", journal_path.display());
        println!("Config written to {}", config_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(kdf: Option<KdfChoice>, iterations: Option<u32>) -> InitArgs {
        InitArgs {
            path: None,
            kdf,
            iterations,
            feedback: false,
            config_path: None,
        }
    }

    #[test]
    fn test_default_kdf_is_pbkdf2() {
        assert_eq!(kdf_from_args(&args(None, None)), KdfParams::default());
        assert_eq!(
            kdf_from_args(&args(None, Some(250_000))),
            KdfParams::pbkdf2(250_000)
        );
    }

    #[test]
    fn test_config_write_failure_removes_journal() {
        let dir = tempfile::tempdir().unwrap();
        let journal_path = dir.path().join("journal.db");
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let config_path = blocker.join("config.toml");
        let config = InkwellConfig::new(journal_path.clone(), KdfParams::default(), false);

        assert!(create_journal_and_config(&journal_path, &config_path, &config).is_err());
        assert!(!journal_path.exists());

        let config_path = dir.path().join("config.toml");
        create_journal_and_config(&journal_path, &config_path, &config).unwrap();
        assert!(journal_path.exists());
        assert!(config_path.exists());
    }

    #[test]
    fn test_existing_journal_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let journal_path = dir.path().join("journal.db");
        std::fs::write(&journal_path, "keep me").unwrap();
        let config_path = dir.path().join("config.toml");
        let config = InkwellConfig::new(journal_path.clone(), KdfParams::default(), false);

        assert!(create_journal_and_config(&journal_path, &config_path, &config).is_err());
        assert_eq!(std::fs::read_to_string(&journal_path).unwrap(), "keep me");
        assert!(!config_path.exists());
    }

    #[test]
    fn test_argon2_iterations_override() {
        assert_eq!(
            kdf_from_args(&args(Some(KdfChoice::Argon2id), None)),
            KdfParams::argon2id()
        );
        let params = kdf_from_args(&args(Some(KdfChoice::Argon2id), Some(5)));
        assert!(matches!(params, KdfParams::Argon2id { iterations: 5, .. }));
    }
}
