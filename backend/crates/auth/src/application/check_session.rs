//! Check Session Use Case
//!
//! Resolves an `Authorization: Bearer` header to the identity that owns the
//! token. Read-only: nothing is written on success or failure.

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use platform::bearer::{BearerError, extract_bearer_token};

use crate::domain::repository::SessionTokenRepository;
use crate::domain::value_object::{
    session_token_value::SessionTokenValue,
    user_id::{SessionTokenId, UserId},
};
use crate::error::{AuthError, AuthResult};

/// Resolved session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInfoOutput {
    pub user_id: UserId,
    pub token_id: SessionTokenId,
    pub expires_at: DateTime<Utc>,
}

/// Check session use case
pub struct CheckSessionUseCase<T>
where
    T: SessionTokenRepository,
{
    token_repo: Arc<T>,
}

impl<T> CheckSessionUseCase<T>
where
    T: SessionTokenRepository,
{
    pub fn new(token_repo: Arc<T>) -> Self {
        Self { token_repo }
    }

    /// Authenticate a request from its headers.
    ///
    /// Header problems are rejected before the token store is consulted.
    pub async fn execute(&self, headers: &HeaderMap) -> AuthResult<SessionInfoOutput> {
        let token = extract_bearer_token(headers).map_err(|e| match e {
            BearerError::Missing => AuthError::MissingCredential,
            BearerError::Malformed => AuthError::MalformedCredential,
        })?;

        self.resolve(&SessionTokenValue::from_raw(token)).await
    }

    /// Look up a bare token value
    pub async fn resolve(&self, token: &SessionTokenValue) -> AuthResult<SessionInfoOutput> {
        let session = match self.token_repo.find_by_token_value(token).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::debug!("Unknown or revoked bearer token");
                return Err(AuthError::SessionInvalid);
            }
            Err(e) => {
                // Reported to the caller exactly like an unknown token
                tracing::error!(error = %e, "Token lookup failed");
                return Err(AuthError::SessionInvalid);
            }
        };

        if session.is_expired_at(Utc::now()) {
            return Err(AuthError::SessionExpired);
        }

        Ok(SessionInfoOutput {
            user_id: session.user_id,
            token_id: session.token_id,
            expires_at: session.expires_at,
        })
    }
}
