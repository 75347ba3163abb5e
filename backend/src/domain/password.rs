//! Password values and argon2id hashing.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Minimum number of characters accepted for a password set over HTTP.
pub const PASSWORD_MIN: usize = 5;

/// Errors raised while validating or hashing passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordError {
    /// Password was empty.
    #[error("password must not be empty")]
    Empty,
    /// Password was shorter than [`PASSWORD_MIN`].
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
    /// The hasher rejected its input.
    #[error("password hashing failed: {message}")]
    Hashing { message: String },
    /// A stored hash was not a PHC string.
    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Plain-text password held only long enough to hash or verify it.
///
/// The buffer is zeroed on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Accept any non-empty password. Whitespace is preserved.
    ///
    /// Length policy belongs to the caller; see [`Password::with_min_length`].
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordError> {
        let raw = Zeroizing::new(raw.into());
        if raw.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(raw))
    }

    /// Accept a password of at least `min` characters.
    pub fn with_min_length(raw: impl Into<String>, min: usize) -> Result<Self, PasswordError> {
        let password = Self::new(raw)?;
        if password.0.chars().count() < min {
            return Err(PasswordError::TooShort { min });
        }
        Ok(password)
    }

    /// Expose the plain text to the hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn generate(password: &Password) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordError::Hashing {
                message: err.to_string(),
            })?;
        Ok(Self(hash.to_string()))
    }

    /// Wrap a PHC string read back from storage.
    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordError> {
        let phc = phc.into();
        password_hash::PasswordHash::new(&phc).map_err(|_| PasswordError::MalformedHash)?;
        Ok(Self(phc))
    }

    /// Check a plain-text candidate against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = password_hash::PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
