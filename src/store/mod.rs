//! Persistence interfaces
//!
//! The authentication core and the handlers talk to storage only through
//! these traits. Each method is a single atomic operation on the backing
//! engine; callers hold no locks across calls.

mod memory;
mod models;
mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::DatabaseError;

pub use memory::MemoryStore;
pub use models::{Chirp, RefreshTokenRecord, TokenState, User};
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, DatabaseError>;

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Create an account; a taken email is `UniqueConstraintViolation`
    async fn create(&self, email: &str, hashed_password: &str) -> StoreResult<User>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> StoreResult<Option<User>>;

    /// Flag the account as a paying member
    async fn upgrade_to_red(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Delete every account together with its sessions and chirps
    async fn reset(&self) -> StoreResult<()>;
}

/// Refresh token persistence
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshTokenRecord>;

    /// Record for `token` only if it is neither revoked nor expired
    async fn find_active_by_token(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>>;

    /// Set `revoked_at` to now unless already set; `None` for an unknown token
    async fn mark_revoked(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>>;
}

/// Chirp persistence
#[async_trait]
pub trait ChirpStore: Send + Sync {
    async fn create(&self, body: &str, user_id: Uuid) -> StoreResult<Chirp>;

    /// All chirps, or one author's, oldest first
    async fn list(&self, author_id: Option<Uuid>) -> StoreResult<Vec<Chirp>>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Chirp>>;

    /// Delete a chirp owned by `user_id`; `None` when nothing matched
    async fn delete(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Chirp>>;
}

/// The stores the application runs on
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub chirps: Arc<dyn ChirpStore>,
}

impl Stores {
    /// Use one backend for every store
    pub fn from_backend<S>(backend: S) -> Self
    where
        S: AccountStore + SessionStore + ChirpStore + 'static,
    {
        let backend = Arc::new(backend);
        Self {
            accounts: backend.clone(),
            sessions: backend.clone(),
            chirps: backend,
        }
    }
}
