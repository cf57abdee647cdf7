//! Secret management service trait.
//!
//! Defines the interface for loading API keys.

use crate::config::SecretConfig;

/// Service for loading secret configuration.
///
/// Implementations must never log secret values or put them into error
/// messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Checks if a secret source exists.
    async fn secret_file_exists(&self) -> bool;
}
