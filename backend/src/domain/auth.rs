//! Authentication primitives: login credentials and API tokens.
//!
//! Tokens are 40 lowercase hex characters handed to the client once. Only
//! their SHA-256 digest is persisted, so a leaked table cannot be replayed.

use std::fmt;

use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random bytes behind each token.
const TOKEN_BYTES: usize = 20;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by token issuance.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Cook@Example.com ", "testpass123")
///     .expect("valid credentials");
/// assert_eq!(creds.email(), "cook@example.com");
/// assert_eq!(creds.password(), "testpass123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string suitable for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Plain API token as shown to its owner.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Generate a fresh random token.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; TOKEN_BYTES]);
        rand::thread_rng().fill_bytes(bytes.as_mut_slice());
        Self(Zeroizing::new(hex::encode(bytes.as_slice())))
    }

    /// Wrap a token presented by a client.
    ///
    /// Returns `None` when the value cannot be a token this service issued.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim();
        let well_formed = candidate.len() == TOKEN_BYTES * 2
            && candidate
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(Zeroizing::new(candidate.to_owned())))
    }

    /// Token text for the response body.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest stored in place of the token.
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Hex-encoded SHA-256 digest of an [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read back from storage.
    pub fn from_hex(hex_digest: impl Into<String>) -> Self {
        Self(hex_digest.into())
    }
}

impl AsRef<str> for TokenDigest {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("user@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  Cook@Example.com  ", " spaced ")]
    #[case("alice@example.com", "correct horse battery staple")]
    fn valid_credentials_normalise_email(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), email.trim().to_lowercase());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn generated_tokens_are_forty_hex_characters() {
        let token = AuthToken::generate();
        assert_eq!(token.expose().len(), 40);
        assert!(AuthToken::parse(token.expose()).is_some());
        assert_ne!(token, AuthToken::generate());
    }

    #[rstest]
    #[case("")]
    #[case("short")]
    #[case("ZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZ")]
    #[case("0123456789ABCDEF0123456789ABCDEF01234567")]
    fn malformed_tokens_are_rejected(#[case] raw: &str) {
        assert!(AuthToken::parse(raw).is_none());
    }

    #[rstest]
    fn digest_is_stable_sha256_hex() {
        let token = AuthToken::parse("0123456789abcdef0123456789abcdef01234567").expect("token");
        let digest = token.digest();
        assert_eq!(digest.as_ref().len(), 64);
        assert_eq!(digest, token.digest());
        assert_ne!(digest.as_ref(), token.expose());
    }
}
