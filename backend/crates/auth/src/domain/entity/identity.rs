//! Identity Entity
//!
//! A registered account: login email, password hash, profile and an optional
//! pending password reset.

use chrono::{DateTime, Utc};

use super::reset_grant::ResetGrant;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword, user_role::UserRole,
};

/// Identity entity
///
/// The password hash lives here but never leaves the crate through a DTO.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: UserId,
    /// Unique among live identities, case-sensitive
    pub email: Email,
    pub password: UserPassword,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub wallet_id: Option<String>,
    pub reset_grant: Option<ResetGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Create a new identity
    pub fn new(
        email: Email,
        password: UserPassword,
        first_name: String,
        last_name: String,
        role: UserRole,
        wallet_id: Option<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email,
            password,
            first_name,
            last_name,
            role,
            wallet_id: wallet_id.filter(|w| !w.is_empty()),
            reset_grant: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the password hash. Any pending reset is discarded with it.
    pub fn change_password(&mut self, password: UserPassword) {
        self.password = password;
        self.reset_grant = None;
        self.touch();
    }

    pub fn grant_reset(&mut self, grant: ResetGrant) {
        self.reset_grant = Some(grant);
        self.touch();
    }

    pub fn set_email(&mut self, email: Email) {
        self.email = email;
        self.touch();
    }

    pub fn set_names(&mut self, first_name: Option<String>, last_name: Option<String>) {
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        self.touch();
    }

    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
        self.touch();
    }

    /// Empty string clears the wallet
    pub fn set_wallet_id(&mut self, wallet_id: String) {
        self.wallet_id = Some(wallet_id).filter(|w| !w.is_empty());
        self.touch();
    }

    /// The pending reset, if it is still redeemable at `now`
    pub fn live_reset_at(&self, now: DateTime<Utc>) -> Option<&ResetGrant> {
        self.reset_grant.as_ref().filter(|g| g.is_live_at(now))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_password::RawPassword;
    use chrono::Duration;

    fn identity() -> Identity {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        Identity::new(
            Email::new("a@x.com").unwrap(),
            UserPassword::from_raw(&raw, None).unwrap(),
            "Ada".into(),
            "Lovelace".into(),
            UserRole::default(),
            Some(String::new()),
        )
    }

    #[test]
    fn test_new_identity() {
        let identity = identity();
        assert_eq!(identity.role, UserRole::User);
        assert!(identity.wallet_id.is_none());
        assert!(identity.reset_grant.is_none());
        assert_eq!(identity.created_at, identity.updated_at);
    }

    #[test]
    fn test_change_password_clears_reset() {
        let mut identity = identity();
        identity.grant_reset(ResetGrant::issue(Duration::minutes(15)));
        assert!(identity.live_reset_at(Utc::now()).is_some());

        let raw = RawPassword::new("another1".to_string()).unwrap();
        identity.change_password(UserPassword::from_raw(&raw, None).unwrap());

        assert!(identity.reset_grant.is_none());
        assert!(identity.password.verify(&raw, None));
    }

    #[test]
    fn test_grant_reset_overwrites() {
        let mut identity = identity();
        let first = ResetGrant::issue(Duration::minutes(15));
        let second = ResetGrant::issue(Duration::minutes(15));
        identity.grant_reset(first);
        identity.grant_reset(second);
        assert_eq!(identity.reset_grant, Some(second));
    }

    #[test]
    fn test_live_reset_ignores_expired() {
        let mut identity = identity();
        identity.grant_reset(ResetGrant::issue(Duration::minutes(15)));
        let later = Utc::now() + Duration::minutes(16);
        assert!(identity.live_reset_at(later).is_none());
    }

    #[test]
    fn test_set_wallet_id() {
        let mut identity = identity();
        identity.set_wallet_id("0xabc".into());
        assert_eq!(identity.wallet_id.as_deref(), Some("0xabc"));
        identity.set_wallet_id(String::new());
        assert!(identity.wallet_id.is_none());
    }
}
