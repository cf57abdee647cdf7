//! File-backed local identity.

use shelf_core::error::Result;
use shelf_core::identity::{IdentityStore, SessionContext};
use std::fs;
use std::path::PathBuf;

/// Stores the signed-in identity as `identity.json`.
///
/// The file holds `{"userId": ..., "userEmail": ...}`, the same keys the web
/// front end keeps in local storage. A missing or unreadable file means
/// "guest".
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl IdentityStore for FileIdentityStore {
    fn load(&self) -> Result<SessionContext> {
        if !self.path.exists() {
            return Ok(SessionContext::guest());
        }
        let content = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&content) {
            Ok(context) => Ok(context),
            Err(err) => {
                tracing::warn!(
                    "[Identity] Ignoring unreadable identity file {}: {}",
                    self.path.display(),
                    err
                );
                Ok(SessionContext::guest())
            }
        }
    }

    fn save(&self, context: &SessionContext) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(context)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
