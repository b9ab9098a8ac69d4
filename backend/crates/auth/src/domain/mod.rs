//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{identity::Identity, reset_grant::ResetGrant, session_token::SessionToken};
pub use repository::{CredentialRepository, SessionTokenRepository};
