/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs. The signing secret is always an
/// explicit argument so several keys can coexist in one process.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::{Claims, ISSUER};
use crate::error::AuthError;

/// Generate a new access token for a user
///
/// The caller decides the lifetime; no clamping happens here.
///
/// # Errors
/// `HashingFailure` if signing fails
pub fn generate_access_token(
    user_id: &Uuid,
    secret: &str,
    ttl: Duration,
) -> Result<String, AuthError> {
    let claims = Claims::new(*user_id, ttl);

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::HashingFailure(format!("token signing failed: {}", e)))
}

/// Validate an access token against the current time and return its subject
pub fn validate_access_token(token: &str, secret: &str) -> Result<Uuid, AuthError> {
    validate_access_token_at(token, secret, Utc::now())?.user_id()
}

/// Validate an access token as of `now`
///
/// # Errors
/// - `InvalidToken` for a bad signature, a foreign issuer, or `now` outside `[iat, exp]`
/// - `MalformedToken` when the string does not decode into the expected claims
pub fn validate_access_token_at(
    token: &str,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // The time window is checked below against the supplied clock.
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("JWT validation error: {}", e);
        classify(e.kind())
    })?;

    if !claims.is_valid_at(now) {
        tracing::debug!(sub = %claims.sub, "JWT outside its validity window");
        return Err(AuthError::InvalidToken);
    }

    claims.user_id()?;
    Ok(claims)
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidIssuer
        | ErrorKind::ExpiredSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidAlgorithm => AuthError::InvalidToken,
        _ => AuthError::MalformedToken,
    }
}
