//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every lookup distinguishes "not found" (`Ok(None)` / `Ok(false)`) from a
//! storage failure (`Err`).

use crate::domain::entity::{
    identity::Identity, reset_grant::ResetGrant, session_token::SessionToken,
};
use crate::domain::value_object::{
    email::Email,
    session_token_value::SessionTokenValue,
    user_id::{ResetTokenId, UserId},
    user_password::UserPassword,
};
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Insert a new identity. Fails with `UserAlreadyExists` when the email
    /// is held by a live identity.
    async fn create_identity(&self, identity: &Identity) -> AuthResult<()>;

    /// Exact (case-sensitive) match among live identities
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<Identity>>;

    /// All live identities, oldest first
    async fn list(&self) -> AuthResult<Vec<Identity>>;

    /// Persist email, names, role and wallet. The stored hash and reset grant
    /// are left as they are, unless `new_password` is given: then the hash is
    /// replaced and the grant cleared in the same write.
    /// Returns `false` when no live identity has this id.
    async fn update_identity(
        &self,
        identity: &Identity,
        new_password: Option<&UserPassword>,
    ) -> AuthResult<bool>;

    /// Soft-delete the identity and revoke its bearer tokens as one unit.
    /// `None` when no live identity has this id, otherwise the number of
    /// tokens revoked.
    async fn delete_identity(&self, user_id: &UserId) -> AuthResult<Option<u64>>;

    /// Store a reset grant, replacing any previous one
    async fn set_reset_token(&self, user_id: &UserId, grant: &ResetGrant) -> AuthResult<()>;

    /// Identity holding this reset token, only while the grant is unexpired
    async fn find_by_reset_token(&self, token: &ResetTokenId) -> AuthResult<Option<Identity>>;

    /// Atomically store the new hash and clear the grant, provided the grant
    /// is still held and unexpired. Returns `false` if it was not.
    async fn complete_password_reset(
        &self,
        user_id: &UserId,
        token: &ResetTokenId,
        new_password: &UserPassword,
    ) -> AuthResult<bool>;
}

/// Token store
#[trait_variant::make(SessionTokenRepository: Send)]
pub trait LocalSessionTokenRepository {
    async fn create(&self, token: &SessionToken) -> AuthResult<()>;

    /// Non-revoked token with this exact value. Expired tokens are returned;
    /// the caller decides what expiry means.
    async fn find_by_token_value(&self, value: &SessionTokenValue)
    -> AuthResult<Option<SessionToken>>;

    /// Revoke every token whose expiry has passed, returning how many
    async fn purge_expired(&self) -> AuthResult<u64>;
}
