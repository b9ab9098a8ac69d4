//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_session;
pub mod complete_reset;
pub mod config;
pub mod initiate_reset;
pub mod manage_users;
pub mod register;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use complete_reset::{CompleteResetInput, CompleteResetUseCase};
pub use config::AuthConfig;
pub use initiate_reset::{InitiateResetInput, InitiateResetOutput, InitiateResetUseCase};
pub use manage_users::{ManageUsersUseCase, UpdateIdentityInput};
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
