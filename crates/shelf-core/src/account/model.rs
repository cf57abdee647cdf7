use serde::{Deserialize, Serialize};

/// Outcome of an account action.
///
/// The record store reports business failures (wrong password, unknown
/// e-mail, bad code) as `success: false` with a message rather than as
/// transport errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: Option<String>,
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub verified: Option<bool>,
}

impl AuthResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// The server's message, or `fallback` when it sent none.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
