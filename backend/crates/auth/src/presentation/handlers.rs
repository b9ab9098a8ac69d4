//! HTTP Handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    AuthenticateInput, AuthenticateUseCase, CompleteResetInput, CompleteResetUseCase,
    InitiateResetInput, InitiateResetUseCase, ManageUsersUseCase, RegisterInput, RegisterUseCase,
    UpdateIdentityInput,
};
use crate::domain::repository::{CredentialRepository, SessionTokenRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthenticateRequest, AuthenticateResponse, ForgotPasswordRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, UpdateUserRequest, UserResponse,
};
use crate::presentation::middleware::AuthenticatedUser;

/// Everything the handlers need from a backing store
pub trait AuthStore:
    CredentialRepository + SessionTokenRepository + Clone + Send + Sync + 'static
{
}

impl<R> AuthStore for R where
    R: CredentialRepository + SessionTokenRepository + Clone + Send + Sync + 'static
{
}

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: AuthStore,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

impl<R> AuthAppState<R>
where
    R: AuthStore,
{
    fn manage_users(&self) -> ManageUsersUseCase<R> {
        ManageUsersUseCase::new(self.repo.clone(), self.config.clone())
    }
}

// ============================================================================
// Public
// ============================================================================

/// POST /users
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AuthResult<(StatusCode, Json<UserResponse>)>
where
    R: AuthStore,
{
    let Json(req) = payload?;
    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            role: req.role,
            wallet_id: req.wallet_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(output.identity.into())))
}

/// POST /users/authenticate
pub async fn authenticate<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<AuthenticateRequest>, JsonRejection>,
) -> AuthResult<Json<AuthenticateResponse>>
where
    R: AuthStore,
{
    let Json(req) = payload?;
    let use_case =
        AuthenticateUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(AuthenticateInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthenticateResponse {
        user: output.identity.into(),
        token: output.token.into_string(),
        expires_at: output.expires_at,
    }))
}

/// POST /users/forgot-password
pub async fn forgot_password<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
{
    let Json(req) = payload?;
    let use_case = InitiateResetUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(InitiateResetInput { email: req.email })
        .await?;

    Ok(Json(MessageResponse::new(
        "Reset token sent to email if user exists",
    )))
}

/// POST /users/reset-password
pub async fn reset_password<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
{
    let Json(req) = payload?;
    let use_case = CompleteResetUseCase::new(state.repo.clone(), state.config.clone());

    use_case
        .execute(CompleteResetInput {
            token: req.token,
            new_password: req.new_password,
        })
        .await?;

    Ok(Json(MessageResponse::new("Password reset successfully")))
}

// ============================================================================
// Protected
// ============================================================================

/// GET /users/me
pub async fn me<R>(
    State(state): State<AuthAppState<R>>,
    user: AuthenticatedUser,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
{
    let identity = state.manage_users().find(&user.user_id).await?;
    Ok(Json(identity.into()))
}

/// GET /users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
) -> AuthResult<Json<Vec<UserResponse>>>
where
    R: AuthStore,
{
    let identities = state.manage_users().list().await?;
    Ok(Json(identities.into_iter().map(Into::into).collect()))
}

/// GET /users/{id}
pub async fn get_user<R>(
    State(state): State<AuthAppState<R>>,
    path: Result<Path<String>, PathRejection>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
{
    let Path(id) = path?;
    let identity = state.manage_users().get(&id).await?;
    Ok(Json(identity.into()))
}

/// PUT /users/{id}
pub async fn update_user<R>(
    State(state): State<AuthAppState<R>>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AuthResult<Json<UserResponse>>
where
    R: AuthStore,
{
    let Path(id) = path?;
    let Json(req) = payload?;

    let identity = state
        .manage_users()
        .update(
            &id,
            UpdateIdentityInput {
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
                role: req.role,
                wallet_id: req.wallet_id,
                password: req.password,
            },
        )
        .await?;

    Ok(Json(identity.into()))
}

/// DELETE /users/{id}
pub async fn delete_user<R>(
    State(state): State<AuthAppState<R>>,
    path: Result<Path<String>, PathRejection>,
) -> AuthResult<Json<MessageResponse>>
where
    R: AuthStore,
{
    let Path(id) = path?;
    state.manage_users().delete(&id).await?;
    Ok(Json(MessageResponse::new("user deleted successfully")))
}
