//! Entity Module

pub mod identity;
pub mod reset_grant;
pub mod session_token;
