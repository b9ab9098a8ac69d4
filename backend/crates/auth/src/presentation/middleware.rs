//! Auth Middleware
//!
//! Bearer-token gate for protected routes.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{DateTime, Utc};

use crate::application::CheckSessionUseCase;
use crate::domain::value_object::user_id::{SessionTokenId, UserId};
use crate::error::AuthError;
use crate::presentation::handlers::{AuthAppState, AuthStore};

/// Identity attached to the request by [`require_bearer_token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub token_id: SessionTokenId,
    pub expires_at: DateTime<Utc>,
}

/// Reject the request with 401 unless it carries a live bearer token
pub async fn require_bearer_token<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError>
where
    R: AuthStore,
{
    let session = CheckSessionUseCase::new(state.repo.clone())
        .execute(req.headers())
        .await?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: session.user_id,
        token_id: session.token_id,
        expires_at: session.expires_at,
    });

    Ok(next.run(req).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only absent when a route forgot the gate
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AuthError::MissingCredential)
    }
}
