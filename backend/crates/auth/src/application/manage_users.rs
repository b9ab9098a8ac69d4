//! Manage Users Use Case
//!
//! Read, update and delete identities by id.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::register::parse_role;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    email::Email,
    user_id::UserId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Fields left as `None` are not touched
#[derive(Default)]
pub struct UpdateIdentityInput {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    /// Empty string clears the wallet
    pub wallet_id: Option<String>,
    pub password: Option<String>,
}

pub struct ManageUsersUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> ManageUsersUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn get(&self, user_id: &str) -> AuthResult<Identity> {
        self.find(&UserId::parse(user_id)?).await
    }

    pub async fn find(&self, user_id: &UserId) -> AuthResult<Identity> {
        self.credential_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn list(&self) -> AuthResult<Vec<Identity>> {
        self.credential_repo.list().await
    }

    pub async fn update(&self, user_id: &str, input: UpdateIdentityInput) -> AuthResult<Identity> {
        let user_id = UserId::parse(user_id)?;

        let mut identity = self.find(&user_id).await?;

        if let Some(email) = input.email {
            let email = Email::new(email)?;
            if email != identity.email {
                if let Some(holder) = self.credential_repo.find_by_email(&email).await? {
                    if holder.user_id != identity.user_id {
                        return Err(AuthError::UserAlreadyExists);
                    }
                }
                identity.set_email(email);
            }
        }

        if input.first_name.is_some() || input.last_name.is_some() {
            identity.set_names(input.first_name, input.last_name);
        }

        if let Some(role) = input.role.as_deref() {
            identity.set_role(parse_role(role)?);
        }

        if let Some(wallet_id) = input.wallet_id {
            identity.set_wallet_id(wallet_id);
        }

        let new_password = match input.password {
            Some(password) => {
                let raw_password = RawPassword::new(password)?;
                Some(UserPassword::from_raw(&raw_password, self.config.pepper())?)
            }
            None => None,
        };
        if let Some(password) = &new_password {
            identity.change_password(password.clone());
        }

        if !self
            .credential_repo
            .update_identity(&identity, new_password.as_ref())
            .await?
        {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %identity.user_id, "User updated");

        Ok(identity)
    }

    /// Soft-delete the identity together with its bearer tokens
    pub async fn delete(&self, user_id: &str) -> AuthResult<()> {
        let user_id = UserId::parse(user_id)?;

        let Some(revoked) = self.credential_repo.delete_identity(&user_id).await? else {
            tracing::debug!(user_id = %user_id, "Delete requested for unknown user");
            return Err(AuthError::UserNotFound);
        };

        tracing::info!(user_id = %user_id, tokens_revoked = revoked, "User deleted");

        Ok(())
    }
}
