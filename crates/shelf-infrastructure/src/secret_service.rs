//! Secret service implementation.
//!
//! Reads API keys from `secret.json`, with `GEMINI_API_KEY` taking precedence.

use shelf_core::config::{GeminiConfig, SecretConfig};
use shelf_core::secret::SecretService;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Service for loading secret configuration.
///
/// The file is read once and cached.
#[derive(Clone)]
pub struct SecretServiceImpl {
    path: PathBuf,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    fn load_secrets_internal(&self) -> Result<SecretConfig, String> {
        if let Ok(read_lock) = self.secrets.read() {
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let mut loaded = self.read_file()?;
        if let Ok(api_key) = std::env::var(GEMINI_API_KEY_ENV) {
            if !api_key.trim().is_empty() {
                let model_name = loaded.gemini.and_then(|g| g.model_name);
                loaded.gemini = Some(GeminiConfig {
                    api_key,
                    model_name,
                });
            }
        }

        if let Ok(mut write_lock) = self.secrets.write() {
            *write_lock = Some(loaded.clone());
        }
        Ok(loaded)
    }

    fn read_file(&self) -> Result<SecretConfig, String> {
        if !self.path.exists() {
            return Ok(SecretConfig::default());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| format!("Failed to read {}: {}", self.path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {}", self.path.display(), e))
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        self.load_secrets_internal()
    }

    async fn secret_file_exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_secret_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, r#"{"gemini": {"api_key": "abc", "model_name": "gemini-pro"}}"#).unwrap();
        let service = SecretServiceImpl::new(path);

        assert!(service.secret_file_exists().await);
        let secrets = service.load_secrets().await.unwrap();
        let gemini = secrets.gemini.unwrap();
        // The environment may supply a key, but the model name always comes from the file
        assert_eq!(gemini.model_name.as_deref(), Some("gemini-pro"));
        assert!(!gemini.api_key.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_file_is_an_error_without_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("secret.json");
        fs::write(&path, "{ not json").unwrap();
        let service = SecretServiceImpl::new(path);

        let err = service.load_secrets().await.unwrap_err();
        assert!(err.contains("Failed to parse"));
    }
}
