//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Identities, session tokens, reset grants, repository traits
//! - `application/` - Use cases (register, authenticate, session check, reset, user management)
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers, DTOs, bearer middleware, router
//!
//! ## Features
//! - Registration and login with email + password
//! - Opaque bearer tokens stored server-side with a fixed lifetime
//! - Password reset through single-use, time-limited grants
//! - User listing, lookup, update and soft deletion behind the bearer gate
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional server-side pepper
//! - Storage failures never leak through the bearer gate
//! - Deleting a user revokes every token it holds

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult, ErrorCategory};
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::{users_router, users_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
