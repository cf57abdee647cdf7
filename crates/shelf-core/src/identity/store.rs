use super::context::SessionContext;
use crate::error::Result;

/// Durable storage for the local identity.
pub trait IdentityStore: Send + Sync {
    /// Loads the stored identity; a missing store yields a guest context.
    fn load(&self) -> Result<SessionContext>;

    fn save(&self, context: &SessionContext) -> Result<()>;

    fn clear(&self) -> Result<()>;
}
