//! Value Object Module

pub mod email;
pub mod session_token_value;
pub mod user_id;
pub mod user_password;
pub mod user_role;
