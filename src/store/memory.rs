use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::models::{Chirp, RefreshTokenRecord, TokenState, User};
use super::{AccountStore, ChirpStore, SessionStore, StoreResult};
use crate::error::DatabaseError;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, RefreshTokenRecord>,
    chirps: Vec<Chirp>,
}

/// In-process store backed by a single mutex.
///
/// Every operation runs inside one critical section, which gives the same
/// per-record atomicity the Postgres store gets from single statements.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| DatabaseError::UnexpectedError("memory store poisoned".to_string()))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, email: &str, hashed_password: &str) -> StoreResult<User> {
        let mut inner = self.lock()?;
        if inner.users.values().any(|u| u.email == email) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.lock()?;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> StoreResult<Option<User>> {
        let mut inner = self.lock()?;
        if inner.users.values().any(|u| u.email == email && u.id != id) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "users_email_key".to_string(),
            ));
        }

        Ok(inner.users.get_mut(&id).map(|user| {
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn upgrade_to_red(&self, id: Uuid) -> StoreResult<Option<User>> {
        let mut inner = self.lock()?;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.is_chirpy_red = true;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn reset(&self) -> StoreResult<()> {
        let mut inner = self.lock()?;
        *inner = Inner::default();
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<RefreshTokenRecord> {
        let mut inner = self.lock()?;
        if !inner.users.contains_key(&user_id) {
            return Err(DatabaseError::QueryExecution(
                "refresh token references unknown user".to_string(),
            ));
        }
        if inner.sessions.contains_key(token) {
            return Err(DatabaseError::UniqueConstraintViolation(
                "refresh_tokens_pkey".to_string(),
            ));
        }

        let now = Utc::now();
        let record = RefreshTokenRecord {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        inner.sessions.insert(token.to_string(), record.clone());
        Ok(record)
    }

    async fn find_active_by_token(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>> {
        let inner = self.lock()?;
        let now = Utc::now();
        Ok(inner
            .sessions
            .get(token)
            .filter(|record| record.state(now) == TokenState::Active)
            .cloned())
    }

    async fn mark_revoked(&self, token: &str) -> StoreResult<Option<RefreshTokenRecord>> {
        let mut inner = self.lock()?;
        Ok(inner.sessions.get_mut(token).map(|record| {
            if record.revoked_at.is_none() {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
            }
            record.clone()
        }))
    }
}

#[async_trait]
impl ChirpStore for MemoryStore {
    async fn create(&self, body: &str, user_id: Uuid) -> StoreResult<Chirp> {
        let mut inner = self.lock()?;
        if !inner.users.contains_key(&user_id) {
            return Err(DatabaseError::QueryExecution(
                "chirp references unknown user".to_string(),
            ));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        inner.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list(&self, author_id: Option<Uuid>) -> StoreResult<Vec<Chirp>> {
        let inner = self.lock()?;
        // Insertion order is creation order.
        Ok(inner
            .chirps
            .iter()
            .filter(|c| author_id.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Chirp>> {
        Ok(self.lock()?.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Chirp>> {
        let mut inner = self.lock()?;
        let position = inner
            .chirps
            .iter()
            .position(|c| c.id == id && c.user_id == user_id);
        Ok(position.map(|index| inner.chirps.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    async fn store_with_user() -> (MemoryStore, User) {
        let store = MemoryStore::new();
        let user = AccountStore::create(&store, "saul@bettercall.com", "hash")
            .await
            .unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_user().await;
        let result = AccountStore::create(&store, "saul@bettercall.com", "other").await;

        assert!(matches!(
            result,
            Err(DatabaseError::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let (store, user) = store_with_user().await;
        let expires_at = Utc::now() + Duration::days(60);
        store.insert("tok", user.id, expires_at).await.unwrap();

        let found = store.find_active_by_token("tok").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);

        let revoked = store.mark_revoked("tok").await.unwrap().unwrap();
        assert!(revoked.revoked_at.is_some());
        assert!(store.find_active_by_token("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revocation_time_is_kept() {
        let (store, user) = store_with_user().await;
        store
            .insert("tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        let first = store.mark_revoked("tok").await.unwrap().unwrap();
        let second = store.mark_revoked("tok").await.unwrap().unwrap();
        assert_eq!(first.revoked_at, second.revoked_at);
        assert_eq!(first.updated_at, second.updated_at);
    }

    #[tokio::test]
    async fn test_expired_session_not_active() {
        let (store, user) = store_with_user().await;
        store
            .insert("old", user.id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(store.find_active_by_token("old").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_revocation() {
        let store = MemoryStore::new();
        assert!(store.mark_revoked("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_chirp_listing_and_delete() {
        let (store, user) = store_with_user().await;
        let other = AccountStore::create(&store, "walter@white.com", "hash")
            .await
            .unwrap();

        let first = ChirpStore::create(&store, "first", user.id).await.unwrap();
        ChirpStore::create(&store, "second", other.id).await.unwrap();
        ChirpStore::create(&store, "third", user.id).await.unwrap();

        let all = store.list(None).await.unwrap();
        assert_eq!(
            all.iter().map(|c| c.body.as_str()).collect::<Vec<_>>(),
            vec!["first", "second", "third"]
        );
        assert_eq!(store.list(Some(user.id)).await.unwrap().len(), 2);

        assert!(store.delete(first.id, other.id).await.unwrap().is_none());
        assert!(store.delete(first.id, user.id).await.unwrap().is_some());
        assert!(ChirpStore::find_by_id(&store, first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_everything() {
        let (store, user) = store_with_user().await;
        ChirpStore::create(&store, "hello", user.id).await.unwrap();
        store
            .insert("tok", user.id, Utc::now() + Duration::days(1))
            .await
            .unwrap();

        store.reset().await.unwrap();

        assert!(store.find_by_email("saul@bettercall.com").await.unwrap().is_none());
        assert!(store.list(None).await.unwrap().is_empty());
        assert!(store.find_active_by_token("tok").await.unwrap().is_none());
    }
}
