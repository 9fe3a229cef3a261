/// Password Hashing and Verification
///
/// bcrypt with a fixed cost. Password policy lives in `validators`;
/// anything that reaches this module is hashed as-is.

use bcrypt::{hash, verify};

use crate::error::AuthError;

/// bcrypt work factor
pub const BCRYPT_COST: u32 = 10;

/// Hash a password using bcrypt
///
/// # Errors
/// `HashingFailure` if bcrypt fails internally
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash(password, BCRYPT_COST).map_err(|e| AuthError::HashingFailure(e.to_string()))
}

/// Verify a password against its hash
///
/// A mismatch is `Ok(false)`, not an error.
///
/// # Errors
/// `HashingFailure` if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    verify(password, hash).map_err(|e| AuthError::HashingFailure(e.to_string()))
}
