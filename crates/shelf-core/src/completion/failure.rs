use crate::error::ShelfError;

/// Shown instead of the raw error when the model's quota is used up.
pub const COOLDOWN_MESSAGE: &str = "I've done a lot of thinking today and need a little rest! \
Come back tomorrow and I'll be full of energy to keep reading with you. ❤️";

/// Shown when the completion service cannot be reached.
pub const CONNECTION_FAILED_MESSAGE: &str =
    "Connection failed. Please check your network or API settings and try again.";

/// Text of the synthetic assistant turn that replaces a failed completion.
pub fn failure_reply(err: &ShelfError) -> String {
    if err.is_quota() {
        return COOLDOWN_MESSAGE.to_string();
    }
    match err {
        ShelfError::Network(_) => CONNECTION_FAILED_MESSAGE.to_string(),
        ShelfError::Completion { message, .. } => format!("⚠️ API error: {message}"),
        other => format!("⚠️ API error: {other}"),
    }
}
