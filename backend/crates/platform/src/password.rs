//! Argon2id password hashing over NFKC-normalised clear text.
//!
//! An optional pepper is appended to the clear text before hashing, so the
//! same pepper must be supplied to [`HashedPassword::verify`].

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password needs {min} characters or more, got {actual}")]
    TooShort { min: usize, actual: usize },
    #[error("Password allows {max} characters at most, got {actual}")]
    TooLong { max: usize, actual: usize },
    #[error("Password is blank")]
    EmptyOrWhitespace,
    #[error("Password contains control characters")]
    InvalidCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("argon2: {0}")]
    Argon2(String),
    #[error("not a PHC hash string")]
    NotPhc,
}

/// Lengths are counted in code points after normalisation.
fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    match password.chars().count() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
            actual: n,
        }),
        n if n > MAX_PASSWORD_LENGTH => Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
            actual: n,
        }),
        _ if password
            .chars()
            .any(|ch| ch.is_control() && !matches!(ch, ' ' | '\t' | '\n')) =>
        {
            Err(PasswordPolicyError::InvalidCharacter)
        }
        _ => Ok(()),
    }
}

/// Normalised clear text. Zeroized on drop, never `Clone`, redacted in `Debug`.
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("secret1".to_string()).unwrap();
/// let hashed = password.hash(None).unwrap();
/// assert!(hashed.verify(&password, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalise and enforce the length and character policy
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::normalized(raw);
        check_policy(&password.0)?;
        Ok(password)
    }

    /// Normalise only. For login attempts, where a policy violation simply
    /// fails to match.
    pub fn normalized(raw: String) -> Self {
        let raw = Zeroizing::new(raw);
        Self(raw.nfkc().collect())
    }

    fn with_pepper(&self, pepper: Option<&[u8]>) -> Zeroizing<Vec<u8>> {
        let mut bytes = Zeroizing::new(self.0.as_bytes().to_vec());
        bytes.extend_from_slice(pepper.unwrap_or_default());
        bytes
    }

    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(&self.with_pepper(pepper), &salt)
            .map(|phc| HashedPassword(phc.to_string()))
            .map_err(|e| PasswordHashError::Argon2(e.to_string()))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// PHC-format Argon2 hash, safe to persist
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        match PasswordHash::new(&phc) {
            Ok(_) => Ok(Self(phc)),
            Err(_) => Err(PasswordHashError::NotPhc),
        }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(&password.with_pepper(pepper), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}
