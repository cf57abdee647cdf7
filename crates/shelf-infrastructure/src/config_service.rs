//! Loading of `config.toml` with environment overrides.

use shelf_core::config::AppConfig;
use shelf_core::error::{Result, ShelfError};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `record_store.url`.
pub const RECORD_STORE_URL_ENV: &str = "SHELF_RECORD_STORE_URL";

/// Environment variable overriding `completion.model`.
pub const GEMINI_MODEL_ENV: &str = "GEMINI_MODEL";

/// Reads the application configuration.
///
/// Responsibilities:
/// - Parse `config.toml` (a missing or blank file means defaults)
/// - Apply environment overrides on top of the file
///
/// Does NOT:
/// - Read secrets (see `SecretServiceImpl`)
/// - Write the file back
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file and applies overrides from the process environment.
    pub fn load(&self) -> Result<AppConfig> {
        let config = self.load_file()?;
        Ok(apply_overrides(config, |key| std::env::var(key).ok()))
    }

    /// Loads the file alone.
    pub fn load_file(&self) -> Result<AppConfig> {
        if !self.path.exists() {
            tracing::debug!(
                "[Config] No config file at {}, using defaults",
                self.path.display()
            );
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(AppConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            ShelfError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

/// Applies environment overrides using `lookup` to read variables.
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> AppConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(RECORD_STORE_URL_ENV).filter(|v| !v.trim().is_empty()) {
        config.record_store.url = Some(url);
    }
    if let Some(model) = lookup(GEMINI_MODEL_ENV).filter(|v| !v.trim().is_empty()) {
        config.completion.model = model;
    }
    config
}
