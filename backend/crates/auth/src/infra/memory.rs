//! In-memory repositories for tests
//!
//! Mirrors the Postgres semantics (soft deletes, case-sensitive unique email,
//! store-side expiry check on reset lookup) and adds test hooks: a counter of
//! token lookups, a switch that makes every call fail, and one that fails only
//! token revocation.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    identity::Identity, reset_grant::ResetGrant, session_token::SessionToken,
};
use crate::domain::repository::{CredentialRepository, SessionTokenRepository};
use crate::domain::value_object::{
    email::Email,
    session_token_value::SessionTokenValue,
    user_id::{ResetTokenId, UserId},
    user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    token_lookups: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
    failing_revocation: Arc<AtomicBool>,
}

#[derive(Default)]
struct State {
    identities: Vec<StoredIdentity>,
    tokens: Vec<SessionToken>,
}

struct StoredIdentity {
    identity: Identity,
    deleted_at: Option<DateTime<Utc>>,
}

impl State {
    fn live(&self) -> impl Iterator<Item = &Identity> {
        self.identities
            .iter()
            .filter(|s| s.deleted_at.is_none())
            .map(|s| &s.identity)
    }

    fn live_mut(&mut self, user_id: &UserId) -> Option<&mut StoredIdentity> {
        self.identities
            .iter_mut()
            .find(|s| s.deleted_at.is_none() && s.identity.user_id == *user_id)
    }

    fn revoke_tokens(&mut self, user_id: &UserId) -> u64 {
        let mut revoked = 0;
        for token in self.tokens.iter_mut() {
            if token.user_id == *user_id && !token.is_revoked() {
                token.revoke();
                revoked += 1;
            }
        }
        revoked
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call return a storage error
    pub fn fail_storage(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make the token revocation inside `delete_identity` fail
    pub fn fail_token_revocation(&self, failing: bool) {
        self.failing_revocation.store(failing, Ordering::SeqCst);
    }

    /// Revoke every live token of an identity, returning how many
    pub fn revoke_tokens_of(&self, user_id: &UserId) -> u64 {
        self.lock().revoke_tokens(user_id)
    }

    /// Number of `find_by_token_value` calls so far
    pub fn token_lookups(&self) -> usize {
        self.token_lookups.load(Ordering::SeqCst)
    }

    /// Raw view of an identity, deleted or not
    pub fn stored_identity(&self, user_id: &UserId) -> Option<Identity> {
        self.lock()
            .identities
            .iter()
            .find(|s| s.identity.user_id == *user_id)
            .map(|s| s.identity.clone())
    }

    pub fn is_deleted(&self, user_id: &UserId) -> bool {
        self.lock()
            .identities
            .iter()
            .any(|s| s.identity.user_id == *user_id && s.deleted_at.is_some())
    }

    /// All tokens of an identity, revoked ones included
    pub fn tokens_of(&self, user_id: &UserId) -> Vec<SessionToken> {
        self.lock()
            .tokens
            .iter()
            .filter(|t| t.user_id == *user_id)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn check(&self) -> AuthResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

impl CredentialRepository for MemoryStore {
    async fn create_identity(&self, identity: &Identity) -> AuthResult<()> {
        self.check()?;
        let mut state = self.lock();
        if state.live().any(|i| i.email == identity.email) {
            return Err(AuthError::UserAlreadyExists);
        }
        state.identities.push(StoredIdentity {
            identity: identity.clone(),
            deleted_at: None,
        });
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        self.check()?;
        Ok(self.lock().live().find(|i| i.email == *email).cloned())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>> {
        self.check()?;
        Ok(self.lock().live().find(|i| i.user_id == *user_id).cloned())
    }

    async fn list(&self) -> AuthResult<Vec<Identity>> {
        self.check()?;
        Ok(self.lock().live().cloned().collect())
    }

    async fn update_identity(
        &self,
        identity: &Identity,
        new_password: Option<&UserPassword>,
    ) -> AuthResult<bool> {
        self.check()?;
        let mut state = self.lock();
        if state
            .live()
            .any(|i| i.email == identity.email && i.user_id != identity.user_id)
        {
            return Err(AuthError::UserAlreadyExists);
        }
        let Some(stored) = state.live_mut(&identity.user_id) else {
            return Ok(false);
        };
        let current = &mut stored.identity;
        current.email = identity.email.clone();
        current.first_name = identity.first_name.clone();
        current.last_name = identity.last_name.clone();
        current.role = identity.role;
        current.wallet_id = identity.wallet_id.clone();
        if let Some(password) = new_password {
            current.change_password(password.clone());
        }
        current.updated_at = identity.updated_at;
        Ok(true)
    }

    async fn delete_identity(&self, user_id: &UserId) -> AuthResult<Option<u64>> {
        self.check()?;
        let mut state = self.lock();
        if state.live_mut(user_id).is_none() {
            return Ok(None);
        }
        // Nothing is written unless both steps succeed
        if self.failing_revocation.load(Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::PoolTimedOut));
        }
        let revoked = state.revoke_tokens(user_id);
        if let Some(stored) = state.live_mut(user_id) {
            stored.deleted_at = Some(Utc::now());
        }
        Ok(Some(revoked))
    }

    async fn set_reset_token(&self, user_id: &UserId, grant: &ResetGrant) -> AuthResult<()> {
        self.check()?;
        if let Some(stored) = self.lock().live_mut(user_id) {
            stored.identity.grant_reset(*grant);
        }
        Ok(())
    }

    async fn find_by_reset_token(&self, token: &ResetTokenId) -> AuthResult<Option<Identity>> {
        self.check()?;
        let now = Utc::now();
        Ok(self
            .lock()
            .live()
            .find(|i| i.live_reset_at(now).is_some_and(|g| g.token == *token))
            .cloned())
    }

    async fn complete_password_reset(
        &self,
        user_id: &UserId,
        token: &ResetTokenId,
        new_password: &UserPassword,
    ) -> AuthResult<bool> {
        self.check()?;
        let now = Utc::now();
        let mut state = self.lock();
        let Some(stored) = state.live_mut(user_id) else {
            return Ok(false);
        };
        if !stored
            .identity
            .live_reset_at(now)
            .is_some_and(|g| g.token == *token)
        {
            return Ok(false);
        }
        stored.identity.change_password(new_password.clone());
        Ok(true)
    }
}

impl SessionTokenRepository for MemoryStore {
    async fn create(&self, token: &SessionToken) -> AuthResult<()> {
        self.check()?;
        let mut state = self.lock();
        if state.tokens.iter().any(|t| t.token == token.token) {
            return Err(AuthError::Internal("duplicate token value".into()));
        }
        state.tokens.push(token.clone());
        Ok(())
    }

    async fn find_by_token_value(
        &self,
        value: &SessionTokenValue,
    ) -> AuthResult<Option<SessionToken>> {
        self.token_lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self
            .lock()
            .tokens
            .iter()
            .find(|t| !t.is_revoked() && t.token == *value)
            .cloned())
    }

    async fn purge_expired(&self) -> AuthResult<u64> {
        self.check()?;
        let now = Utc::now();
        let mut purged = 0;
        for token in self.lock().tokens.iter_mut() {
            if token.is_expired_at(now) && !token.is_revoked() {
                token.revoke();
                purged += 1;
            }
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(user_id: UserId, ttl: Duration) -> SessionToken {
        SessionToken::issue(user_id, SessionTokenValue::generate(32), ttl)
    }

    #[tokio::test]
    async fn test_purge_expired_revokes_only_expired() {
        let store = MemoryStore::new();
        let user_id = UserId::new();
        let live = token(user_id, Duration::hours(24));
        let stale = token(user_id, Duration::seconds(-1));
        store.create(&live).await.unwrap();
        store.create(&stale).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 1);
        assert_eq!(store.purge_expired().await.unwrap(), 0);

        assert!(store.find_by_token_value(&live.token).await.unwrap().is_some());
        assert!(store.find_by_token_value(&stale.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_tokens_of_counts_live_tokens() {
        let store = MemoryStore::new();
        let user_id = UserId::new();
        store.create(&token(user_id, Duration::hours(1))).await.unwrap();
        store.create(&token(user_id, Duration::hours(1))).await.unwrap();
        store.create(&token(UserId::new(), Duration::hours(1))).await.unwrap();

        assert_eq!(store.revoke_tokens_of(&user_id), 2);
        assert_eq!(store.revoke_tokens_of(&user_id), 0);
    }
}
