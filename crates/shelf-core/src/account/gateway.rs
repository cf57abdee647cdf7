use super::model::AuthResponse;
use crate::error::Result;
use async_trait::async_trait;

/// Account actions offered by the record store.
///
/// Passwords never cross this boundary in clear text; callers pass the
/// output of [`super::hash_password`].
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn login(&self, user_id: &str, pass_hash: &str) -> Result<AuthResponse>;

    async fn sign_up(
        &self,
        user_id: &str,
        pass_hash: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse>;

    /// Sends a one-time code to `email`.
    async fn send_verification_code(&self, email: &str) -> Result<AuthResponse>;

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_pass_hash: &str,
    ) -> Result<AuthResponse>;

    async fn bind_email(&self, user_id: &str, email: &str) -> Result<AuthResponse>;
}
