//! Shared fixtures for use case tests

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::register::{RegisterInput, RegisterUseCase};
use crate::domain::entity::identity::Identity;
use crate::infra::memory::MemoryStore;

pub fn config() -> Arc<AuthConfig> {
    Arc::new(AuthConfig::default())
}

pub fn register_input(email: &str, password: &str) -> RegisterInput {
    RegisterInput {
        email: email.to_string(),
        password: password.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: None,
        wallet_id: None,
    }
}

pub async fn registered(store: &Arc<MemoryStore>, email: &str, password: &str) -> Identity {
    RegisterUseCase::new(store.clone(), config())
        .execute(register_input(email, password))
        .await
        .unwrap()
        .identity
}
