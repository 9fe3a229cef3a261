/// Refresh Token Generation
///
/// Refresh tokens are opaque session handles:
/// - 32 bytes from the operating system RNG, hex encoded
/// - persisted by the session store, which may keep only their SHA-256 digest
/// - never rotated on use; they die by revocation or by expiry

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::AuthError;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new cryptographically secure refresh token
///
/// # Errors
/// `EntropyFailure` if the OS randomness source is unavailable. This is
/// never retried with a weaker source.
pub fn generate_refresh_token() -> Result<String, AuthError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::EntropyFailure(e.to_string()))?;
    Ok(hex::encode(bytes))
}

/// SHA-256 digest of a refresh token, hex encoded
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
