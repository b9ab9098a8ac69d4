//! Register Use Case
//!
//! Creates a new identity.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::identity::Identity;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};
use kernel::error::app_error::AppError;

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to `user` when absent
    pub role: Option<String>,
    pub wallet_id: Option<String>,
}

/// Register output
pub struct RegisterOutput {
    pub identity: Identity,
}

/// Parse a caller-supplied role. Unknown codes are rejected, not coerced.
pub(crate) fn parse_role(code: &str) -> AuthResult<UserRole> {
    UserRole::parse(code).ok_or_else(|| {
        AuthError::Validation(
            AppError::bad_request(format!("Invalid role: {code}"))
                .with_action("Use one of: user, admin, influencer"),
        )
    })
}

/// Register use case
pub struct RegisterUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> RegisterUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let email = Email::new(input.email)?;

        let role = match input.role.as_deref() {
            None | Some("") => UserRole::default(),
            Some(code) => parse_role(code)?,
        };

        let raw_password = RawPassword::new(input.password)?;

        if self.credential_repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let identity = Identity::new(
            email,
            password_hash,
            input.first_name,
            input.last_name,
            role,
            input.wallet_id,
        );

        // Unique index catches a concurrent registration of the same email
        self.credential_repo.create_identity(&identity).await?;

        tracing::info!(
            user_id = %identity.user_id,
            role = %identity.role,
            "User registered"
        );

        Ok(RegisterOutput { identity })
    }
}
