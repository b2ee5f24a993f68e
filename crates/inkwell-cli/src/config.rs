use std::path::{Path, PathBuf};

use inkwell_core::crypto::KdfParams;
use serde::{Deserialize, Serialize};

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_FEEDBACK_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_FEEDBACK_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FEEDBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Serialize, Deserialize)]
pub struct InkwellConfig {
    pub journal: JournalSection,
    #[serde(default)]
    pub kdf: KdfParams,
    #[serde(default)]
    pub feedback: FeedbackSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JournalSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackSection {
    pub enabled: bool,
    pub model: String,
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FeedbackSection {
    fn default() -> Self {
        Self {
            enabled: false,
            model: DEFAULT_FEEDBACK_MODEL.to_string(),
            base_url: DEFAULT_FEEDBACK_BASE_URL.to_string(),
            api_key_env: DEFAULT_FEEDBACK_API_KEY_ENV.to_string(),
        }
    }
}

impl InkwellConfig {
    pub fn new(journal_path: PathBuf, kdf: KdfParams, feedback_enabled: bool) -> Self {
        Self {
            journal: JournalSection {
                path: journal_path.to_string_lossy().to_string(),
            },
            kdf,
            feedback: FeedbackSection {
                enabled: feedback_enabled,
                ..FeedbackSection::default()
            },
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_journal_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("journal.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<InkwellConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    let config: InkwellConfig = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))?;
    config
        .kdf
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid [kdf] in {}: {}", path.display(), e))?;
    Ok(config)
}

pub fn write_config(path: &Path, config: &InkwellConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("inkwell"));
        }
    }
    Ok(home_dir()?.join(".config").join("inkwell"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("inkwell"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("inkwell"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
