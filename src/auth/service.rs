/// Authentication Coordinator
///
/// Orchestrates login, refresh, revocation and request authentication on
/// top of the password hasher, the JWT codec, the refresh token generator
/// and the account/session stores.

use actix_web::http::header::HeaderMap;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::bearer::extract_bearer;
use crate::auth::jwt::{generate_access_token, validate_access_token};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::refresh_token::generate_refresh_token;
use crate::configuration::JwtSettings;
use crate::error::{AppError, AuthError};
use crate::store::{AccountStore, SessionStore, TokenState, User};

/// Tokens handed out by a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<dyn SessionStore>,
    settings: JwtSettings,
}

impl AuthService {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn SessionStore>,
        settings: JwtSettings,
    ) -> Self {
        Self {
            accounts,
            sessions,
            settings,
        }
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }

    /// Clamp a requested access token lifetime to the configured ceiling.
    /// Absent, zero, negative and oversized requests all get the ceiling.
    pub fn access_token_ttl(&self, requested_seconds: Option<i64>) -> Duration {
        let ceiling = self.settings.access_token_max_ttl;
        let seconds = match requested_seconds {
            Some(s) if s > 0 && s <= ceiling => s,
            _ => ceiling,
        };
        Duration::seconds(seconds)
    }

    /// Create an account with a freshly hashed password
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let hashed_password = hash_password(password)?;
        let user = self.accounts.create(email, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    /// Replace the email and password of an authenticated account
    pub async fn update_credentials(
        &self,
        user_id: Uuid,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let hashed_password = hash_password(password)?;
        let user = self
            .accounts
            .update_credentials(user_id, email, &hashed_password)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        tracing::info!(user_id = %user.id, "Account credentials updated");
        Ok(user)
    }

    /// Verify email and password, then mint an access token and a
    /// persisted refresh token.
    ///
    /// # Errors
    /// - `AccountNotFound` for an unknown email (rendered as 401)
    /// - `Unauthorized` for a wrong password
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        requested_ttl: Option<i64>,
    ) -> Result<LoginOutcome, AppError> {
        let user = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !verify_password(password, &user.hashed_password)? {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::Unauthorized.into());
        }

        let ttl = self.access_token_ttl(requested_ttl);
        let access_token = generate_access_token(&user.id, &self.settings.secret, ttl)?;

        let refresh_token = generate_refresh_token()?;
        let expires_at = Utc::now() + Duration::seconds(self.settings.refresh_token_ttl);
        self.sessions
            .insert(&refresh_token, user.id, expires_at)
            .await?;

        tracing::info!(
            user_id = %user.id,
            access_ttl = ttl.num_seconds(),
            "User logged in"
        );

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    /// Exchange an active refresh token for a new access token.
    /// The refresh token itself is left untouched.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let record = self
            .sessions
            .find_active_by_token(refresh_token)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let state = record.state(Utc::now());
        if state != TokenState::Active {
            tracing::warn!(user_id = %record.user_id, state = ?state, "Stale refresh token");
            return Err(AuthError::Unauthorized.into());
        }

        let ttl = self.access_token_ttl(None);
        let access_token = generate_access_token(&record.user_id, &self.settings.secret, ttl)?;

        tracing::info!(user_id = %record.user_id, "Access token refreshed");
        Ok(access_token)
    }

    /// Revoke a refresh token. Unknown tokens are `Unauthorized`.
    pub async fn revoke(&self, refresh_token: &str) -> Result<(), AppError> {
        let record = self
            .sessions
            .mark_revoked(refresh_token)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        tracing::info!(user_id = %record.user_id, "Refresh token revoked");
        Ok(())
    }
}

/// Establish the caller's identity from an `Authorization: Bearer` access token
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Uuid, AuthError> {
    let token = extract_bearer(headers)?;
    validate_access_token(&token, secret)
}
