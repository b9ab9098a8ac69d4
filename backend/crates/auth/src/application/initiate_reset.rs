//! Initiate Reset Use Case
//!
//! Places a short-lived reset grant on the identity owning an email.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::reset_grant::ResetGrant;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct InitiateResetInput {
    pub email: String,
}

pub struct InitiateResetOutput {
    /// `None` only when the email is unknown and concealment is on
    pub grant: Option<ResetGrant>,
}

pub struct InitiateResetUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> InitiateResetUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: InitiateResetInput) -> AuthResult<InitiateResetOutput> {
        let email = Email::new(input.email)?;

        let Some(identity) = self.credential_repo.find_by_email(&email).await? else {
            if self.config.conceal_unknown_reset_email {
                tracing::debug!("Password reset requested for unknown email");
                return Ok(InitiateResetOutput { grant: None });
            }
            return Err(AuthError::EmailNotFound);
        };

        let grant = ResetGrant::issue(self.config.reset_token_ttl);

        self.credential_repo
            .set_reset_token(&identity.user_id, &grant)
            .await?;

        tracing::info!(
            user_id = %identity.user_id,
            expires_at = %grant.expires_at,
            "Password reset token issued"
        );
        // No mail transport yet; the token is only visible at debug level
        tracing::debug!(
            user_id = %identity.user_id,
            reset_token = %grant.token,
            "Password reset token ready for delivery"
        );

        Ok(InitiateResetOutput { grant: Some(grant) })
    }
}
