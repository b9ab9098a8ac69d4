//! Application Configuration
//!
//! Configuration for the Auth application layer.

use chrono::Duration;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Lifetime of a bearer token (24 hours)
    pub session_ttl: Duration,
    /// Lifetime of a password reset grant (15 minutes)
    pub reset_token_ttl: Duration,
    /// Random bytes per bearer token before encoding
    pub session_token_bytes: usize,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Answer "forgot password" for unknown emails as if they existed
    pub conceal_unknown_reset_email: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl: Duration::hours(24),
            reset_token_ttl: Duration::minutes(15),
            session_token_bytes: 32,
            password_pepper: None,
            conceal_unknown_reset_email: false,
        }
    }
}

impl AuthConfig {
    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.session_ttl, Duration::hours(24));
        assert_eq!(config.reset_token_ttl, Duration::minutes(15));
        assert_eq!(config.session_token_bytes, 32);
        assert!(config.pepper().is_none());
        assert!(!config.conceal_unknown_reset_email);
    }
}
