/// JWT Claims structure
///
/// Payload of an access token: the subject plus the standard
/// registered claims (RFC 7519) needed to bound its validity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Fixed issuer tag stamped into every access token
pub const ISSUER: &str = "chirpy";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: Uuid, ttl: Duration) -> Self {
        Self::issued_at(user_id, ttl, Utc::now())
    }

    pub fn issued_at(user_id: Uuid, ttl: Duration, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            sub: user_id.to_string(),
            iss: ISSUER.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Extract user ID from claims
    ///
    /// # Errors
    /// `MalformedToken` if the subject is not a UUID
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub).map_err(|_| AuthError::MalformedToken)
    }

    /// True when `now` falls inside `[iat, exp]`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        self.iat <= now && now <= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::seconds(3600));

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert!(claims.is_valid_at(Utc::now()));
    }

    #[test]
    fn test_validity_window_bounds() {
        let now = Utc::now();
        let claims = Claims::issued_at(Uuid::new_v4(), Duration::seconds(60), now);

        assert!(claims.is_valid_at(now));
        assert!(claims.is_valid_at(now + Duration::seconds(60)));
        assert!(!claims.is_valid_at(now + Duration::seconds(61)));
        assert!(!claims.is_valid_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_user_id_extraction() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, Duration::seconds(3600));

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn test_invalid_user_id() {
        let mut claims = Claims::new(Uuid::new_v4(), Duration::seconds(3600));
        claims.sub = "invalid-uuid".to_string();

        assert_eq!(claims.user_id(), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_each_token_gets_its_own_id() {
        let user_id = Uuid::new_v4();
        let a = Claims::new(user_id, Duration::seconds(10));
        let b = Claims::new(user_id, Duration::seconds(10));

        assert_ne!(a.jti, b.jti);
    }
}
