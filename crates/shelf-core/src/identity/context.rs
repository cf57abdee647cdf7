use serde::{Deserialize, Serialize};

/// Identity used for record-store calls when nobody is signed in.
pub const GUEST_USER_ID: &str = "guest";

/// The persisted local identity.
///
/// Field names match the keys the web front end keeps in local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "userEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl SessionContext {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            email: email.filter(|e| !e.trim().is_empty()),
        }
    }

    /// The id that scopes record-store calls.
    pub fn effective_user_id(&self) -> &str {
        self.user_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(GUEST_USER_ID)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }

    /// Signed in but without a bound e-mail address.
    pub fn needs_email(&self) -> bool {
        self.is_signed_in() && self.email.is_none()
    }
}
