//! Account use cases and the explicit session context.

use shelf_core::account::{AccountGateway, AuthResponse, hash_password};
use shelf_core::identity::{IdentityStore, SessionContext};
use shelf_core::{Result, ShelfError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The session context shared by every component that scopes calls by user.
pub type SharedContext = Arc<RwLock<SessionContext>>;

/// Sign-in, sign-up, password reset and e-mail binding.
///
/// Owns the [`SessionContext`]: it is read from the [`IdentityStore`] once at
/// construction, replaced on login, updated on e-mail binding and reset to
/// guest on logout. Other services get a handle through [`Self::context`].
///
/// Form validation happens here, before any gateway call.
pub struct AccountService {
    gateway: Arc<dyn AccountGateway>,
    identity_store: Arc<dyn IdentityStore>,
    context: SharedContext,
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShelfError::validation(format!("{field} is required")));
    }
    Ok(())
}

impl AccountService {
    pub fn new(gateway: Arc<dyn AccountGateway>, identity_store: Arc<dyn IdentityStore>) -> Self {
        let context = identity_store.load().unwrap_or_else(|e| {
            tracing::warn!("[AccountService] Failed to load identity, using guest: {}", e);
            SessionContext::guest()
        });
        Self {
            gateway,
            identity_store,
            context: Arc::new(RwLock::new(context)),
        }
    }

    /// A handle to the live session context.
    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    /// A snapshot of the current session context.
    pub async fn current(&self) -> SessionContext {
        self.context.read().await.clone()
    }

    async fn replace_context(&self, context: SessionContext) -> Result<()> {
        self.identity_store.save(&context)?;
        *self.context.write().await = context;
        Ok(())
    }

    pub async fn login(&self, user_id: &str, password: &str) -> Result<AuthResponse> {
        require(user_id, "User id")?;
        require(password, "Password")?;

        let user_id = user_id.trim();
        let response = self
            .gateway
            .login(user_id, &hash_password(password))
            .await?;

        if response.success {
            let signed_in_as = response.user_id.clone().unwrap_or_else(|| user_id.to_string());
            tracing::info!("[AccountService] Signed in as {}", signed_in_as);
            self.replace_context(SessionContext::signed_in(signed_in_as, response.email.clone()))
                .await?;
        } else {
            tracing::info!(
                "[AccountService] Login rejected: {}",
                response.message_or("no reason given")
            );
        }
        Ok(response)
    }

    /// Registers a new account. Does not sign in.
    pub async fn sign_up(
        &self,
        user_id: &str,
        password: &str,
        confirm_password: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse> {
        require(user_id, "User id")?;
        require(password, "Password")?;
        if password != confirm_password {
            return Err(ShelfError::validation("Passwords do not match"));
        }

        let email = email.map(str::trim).filter(|e| !e.is_empty());
        self.gateway
            .sign_up(user_id.trim(), &hash_password(password), email)
            .await
    }

    /// Sends a one-time verification code for password reset.
    pub async fn send_code(&self, email: &str) -> Result<AuthResponse> {
        require(email, "E-mail")?;
        self.gateway.send_verification_code(email.trim()).await
    }

    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<AuthResponse> {
        require(email, "E-mail")?;
        require(code, "Verification code")?;
        require(new_password, "New password")?;

        self.gateway
            .reset_password(email.trim(), code.trim(), &hash_password(new_password))
            .await
    }

    /// Binds an e-mail address to the signed-in account.
    pub async fn bind_email(&self, email: &str) -> Result<AuthResponse> {
        require(email, "E-mail")?;
        let current = self.current().await;
        let Some(user_id) = current.user_id.clone().filter(|_| current.is_signed_in()) else {
            return Err(ShelfError::validation("Sign in before binding an e-mail"));
        };

        let email = email.trim();
        let response = self.gateway.bind_email(&user_id, email).await?;
        if response.success {
            self.replace_context(SessionContext::signed_in(user_id, Some(email.to_string())))
                .await?;
        }
        Ok(response)
    }

    pub async fn logout(&self) -> Result<()> {
        self.identity_store.clear()?;
        *self.context.write().await = SessionContext::guest();
        tracing::info!("[AccountService] Signed out");
        Ok(())
    }
}
