use sha2::{Digest, Sha256};

/// Hashes a password the way the record store expects: SHA-256 over the
/// UTF-8 bytes, rendered as lowercase hex.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
