//! Session Token Entity
//!
//! A bearer credential issued at login. Valid while it exists, is not
//! revoked, and its expiry is strictly in the future. Expiry never slides.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{
    session_token_value::SessionTokenValue,
    user_id::{SessionTokenId, UserId},
};

#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token_id: SessionTokenId,
    /// Owning identity
    pub user_id: UserId,
    pub token: SessionTokenValue,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when revoked
    pub deleted_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Issue a new token for `user_id`, expiring `ttl` from now.
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    pub fn issue(user_id: UserId, token: SessionTokenValue, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            token_id: SessionTokenId::new(),
            user_id,
            token,
            expires_at: now + ttl,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_revoked(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn revoke(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }
}
