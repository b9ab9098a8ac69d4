//! Authenticate Use Case
//!
//! Verifies email + password and issues a bearer token.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::config::AuthConfig;
use crate::domain::entity::{identity::Identity, session_token::SessionToken};
use crate::domain::repository::{CredentialRepository, SessionTokenRepository};
use crate::domain::value_object::{
    email::Email, session_token_value::SessionTokenValue, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};

/// Authenticate input
pub struct AuthenticateInput {
    pub email: String,
    pub password: String,
}

/// Authenticate output
pub struct AuthenticateOutput {
    pub identity: Identity,
    pub token: SessionTokenValue,
    pub expires_at: DateTime<Utc>,
}

/// Authenticate use case
pub struct AuthenticateUseCase<C, T>
where
    C: CredentialRepository,
    T: SessionTokenRepository,
{
    credential_repo: Arc<C>,
    token_repo: Arc<T>,
    config: Arc<AuthConfig>,
}

impl<C, T> AuthenticateUseCase<C, T>
where
    C: CredentialRepository,
    T: SessionTokenRepository,
{
    pub fn new(credential_repo: Arc<C>, token_repo: Arc<T>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            token_repo,
            config,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AuthResult<AuthenticateOutput> {
        // A malformed email cannot belong to anyone
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = RawPassword::attempt(input.password);

        let identity = self
            .credential_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !identity.password.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let session = SessionToken::issue(
            identity.user_id,
            SessionTokenValue::generate(self.config.session_token_bytes),
            self.config.session_ttl,
        );

        self.token_repo.create(&session).await.map_err(|e| {
            tracing::error!(error = %e, user_id = %identity.user_id, "Failed to save token");
            AuthError::Internal("failed to save token".into())
        })?;

        tracing::info!(
            user_id = %identity.user_id,
            expires_at = %session.expires_at,
            "Session issued"
        );

        Ok(AuthenticateOutput {
            identity,
            token: session.token,
            expires_at: session.expires_at,
        })
    }
}
