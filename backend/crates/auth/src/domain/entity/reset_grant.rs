//! Reset Grant
//!
//! A pending password reset held on the identity: one identifier and its
//! expiry. Issuing a new grant replaces the previous one.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::ResetTokenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetGrant {
    pub token: ResetTokenId,
    pub expires_at: DateTime<Utc>,
}

impl ResetGrant {
    /// Issue a fresh grant valid for `ttl` from now
    pub fn issue(ttl: Duration) -> Self {
        Self {
            token: ResetTokenId::new(),
            expires_at: Utc::now() + ttl,
        }
    }

    /// Still redeemable at `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    /// Rebuild from the two nullable columns; a half-set pair is no grant
    pub fn from_columns(
        token: Option<uuid::Uuid>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Option<Self> {
        Some(Self {
            token: ResetTokenId::from_uuid(token?),
            expires_at: expires_at?,
        })
    }
}
