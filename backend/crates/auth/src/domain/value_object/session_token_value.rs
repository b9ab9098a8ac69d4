//! Opaque bearer token value
//!
//! Random bytes encoded as base64url. Carries no structure; the only thing
//! the server ever does with it is look it up.

use std::fmt;

/// Bearer token string as handed to the client
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionTokenValue(String);

impl SessionTokenValue {
    /// Mint a fresh token from `byte_len` bytes of OS randomness
    pub fn generate(byte_len: usize) -> Self {
        Self(platform::crypto::random_token(byte_len))
    }

    /// Wrap a value received from a client or read from the database
    pub fn from_raw(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionTokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionTokenValue")
            .field(&"[REDACTED]")
            .finish()
    }
}
