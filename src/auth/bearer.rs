/// Credential extraction from request headers

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use crate::error::AuthError;

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Read the token from `Authorization: Bearer <token>`
///
/// The prefix is stripped when present; a header without it is taken as a
/// raw token and left to token validation to reject.
///
/// # Errors
/// - `MissingCredential` if the header is absent or blank
/// - `MalformedToken` if the header is not visible ASCII
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    authorization_credential(headers, BEARER_PREFIX)
}

/// Read the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    let value = authorization_value(headers)?;
    match value.strip_prefix(API_KEY_PREFIX) {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(AuthError::MissingCredential),
    }
}

fn authorization_value(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedToken)?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(value)
}

fn authorization_credential(headers: &HeaderMap, prefix: &str) -> Result<String, AuthError> {
    let value = authorization_value(headers)?;
    let credential = value.strip_prefix(prefix).unwrap_or(value).trim();

    if credential.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(credential.to_string())
}

/// Compare two secrets without short-circuiting on the first differing byte
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
