use serde::Deserialize;
use serde_json::Value;
use shelf_core::account::AuthResponse;

/// The common response wrapper: `{success, message?, error?, data?, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

impl ApiEnvelope {
    /// The best human-readable explanation the server gave.
    pub fn reason(&self) -> String {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "The record store reported an error".to_string())
    }

    /// Rows of a listing response; anything but an array means no rows.
    pub fn rows(&self) -> &[Value] {
        match &self.data {
            Some(Value::Array(rows)) => rows,
            _ => &[],
        }
    }
}

impl From<ApiEnvelope> for AuthResponse {
    fn from(envelope: ApiEnvelope) -> Self {
        let message = envelope.message.or(envelope.error);
        AuthResponse {
            success: envelope.success,
            message,
            user_id: envelope.user_id,
            email: envelope.email.filter(|e| !e.trim().is_empty()),
            verified: envelope.verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_tolerates_sparse_payloads() {
        let envelope: ApiEnvelope = serde_json::from_str("{}").unwrap();
        assert!(!envelope.success);
        assert!(envelope.rows().is_empty());
        assert_eq!(envelope.reason(), "The record store reported an error");

        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"success": false, "error": "sheet missing"}"#).unwrap();
        assert_eq!(envelope.reason(), "sheet missing");
    }

    #[test]
    fn test_login_envelope_to_auth_response() {
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{"success": true, "userId": "alice", "email": "", "verified": true}"#,
        )
        .unwrap();

        let response = AuthResponse::from(envelope);
        assert!(response.success);
        assert_eq!(response.user_id.as_deref(), Some("alice"));
        assert_eq!(response.email, None);
        assert_eq!(response.verified, Some(true));
    }
}
