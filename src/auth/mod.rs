/// Authentication module
///
/// Handles password hashing, JWT access tokens, refresh token generation,
/// credential extraction, the login/refresh/revoke lifecycle and
/// ownership checks.

mod bearer;
mod claims;
mod extractor;
mod jwt;
mod ownership;
mod password;
mod refresh_token;
mod service;

pub use bearer::{constant_time_eq, extract_api_key, extract_bearer};
pub use claims::{Claims, ISSUER};
pub use extractor::AuthenticatedUser;
pub use jwt::{generate_access_token, validate_access_token, validate_access_token_at};
pub use ownership::authorize_mutation;
pub use password::{hash_password, verify_password};
pub use refresh_token::{generate_refresh_token, hash_token};
pub use service::{authenticate, AuthService, LoginOutcome};
