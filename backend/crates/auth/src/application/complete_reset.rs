//! Complete Reset Use Case
//!
//! Redeems a reset grant: the new hash is stored and the grant cleared in a
//! single store operation.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    user_id::ResetTokenId,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};
use kernel::error::app_error::AppError;

pub struct CompleteResetInput {
    pub token: String,
    pub new_password: String,
}

pub struct CompleteResetUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> CompleteResetUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: CompleteResetInput) -> AuthResult<()> {
        let token = ResetTokenId::parse(input.token.trim()).map_err(|e| {
            AuthError::Validation(AppError::bad_request("Invalid token format").with_source(e))
        })?;

        let raw_password = RawPassword::new(input.new_password)?;

        // Expiry is enforced by the store
        let identity = self
            .credential_repo
            .find_by_reset_token(&token)
            .await?
            .ok_or(AuthError::InvalidOrExpiredResetToken)?;

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let completed = self
            .credential_repo
            .complete_password_reset(&identity.user_id, &token, &password_hash)
            .await?;

        // Redeemed or expired between lookup and write
        if !completed {
            return Err(AuthError::InvalidOrExpiredResetToken);
        }

        tracing::info!(user_id = %identity.user_id, "Password reset completed");

        Ok(())
    }
}
