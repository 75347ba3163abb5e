//! User accounts.
//!
//! Users log in with their email address. Emails are normalised (trimmed and
//! lower-cased) on construction so lookups never depend on caller casing.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::password::PasswordHash;

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Maximum length of a user's name.
pub const USER_NAME_MAX: usize = 255;

/// Validation errors raised by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Email was missing or blank.
    #[error("users must have an email address")]
    EmptyEmail,
    /// Email did not look like `local@domain`.
    #[error("enter a valid email address")]
    InvalidEmail,
    /// Email exceeded [`EMAIL_MAX`].
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    /// Name exceeded [`USER_NAME_MAX`].
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Normalised email address used as the login identifier.
///
/// ## Invariants
/// - Trimmed and lower-cased.
/// - Exactly one `@` with non-empty local and domain parts.
/// - No interior whitespace; at most [`EMAIL_MAX`] characters.
///
/// # Examples
/// ```
/// use backend::domain::Email;
///
/// let email = Email::new("  Test@EXAMPLE.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "test@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }

        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(UserValidationError::InvalidEmail);
        }

        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Optional free-form name shown alongside the email. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a name, trimming surrounding whitespace.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.chars().count() > USER_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Privilege level of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRole {
    /// Regular account.
    #[default]
    Member,
    /// Account with `is_staff` and `is_superuser` set.
    Superuser,
}

/// Account status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserFlags {
    /// Inactive users cannot obtain or use tokens.
    pub is_active: bool,
    /// May access administrative tooling.
    pub is_staff: bool,
    /// Holds every permission.
    pub is_superuser: bool,
}

impl UserFlags {
    /// Flags for a freshly created account of the given role.
    pub const fn for_role(role: UserRole) -> Self {
        match role {
            UserRole::Member => Self {
                is_active: true,
                is_staff: false,
                is_superuser: false,
            },
            UserRole::Superuser => Self {
                is_active: true,
                is_staff: true,
                is_superuser: true,
            },
        }
    }
}

/// Application user.
///
/// Holds the password hash, never the plain text. Adapters decide which
/// fields reach the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: UserName,
    password_hash: PasswordHash,
    flags: UserFlags,
}

impl User {
    /// Build a user from validated components.
    pub fn new(
        id: UserId,
        email: Email,
        name: UserName,
        password_hash: PasswordHash,
        flags: UserFlags,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
            flags,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalised email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Display name, possibly empty.
    pub fn name(&self) -> &UserName {
        &self.name
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Status flags.
    pub fn flags(&self) -> UserFlags {
        self.flags
    }

    /// Whether the account may authenticate.
    pub fn is_active(&self) -> bool {
        self.flags.is_active
    }

    /// Whether the account is staff.
    pub fn is_staff(&self) -> bool {
        self.flags.is_staff
    }

    /// Whether the account is a superuser.
    pub fn is_superuser(&self) -> bool {
        self.flags.is_superuser
    }

    /// Verify a plain-text password against the stored hash.
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password_hash.verify(candidate)
    }

    /// Replace the email address.
    pub fn set_email(&mut self, email: Email) {
        self.email = email;
    }

    /// Replace the name.
    pub fn set_name(&mut self, name: UserName) {
        self.name = name;
    }

    /// Replace the stored password hash.
    pub fn set_password_hash(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Password;
    use rstest::rstest;

    #[rstest]
    #[case("test1@EXAMPLE.com", "test1@example.com")]
    #[case("Test2@Example.com", "test2@example.com")]
    #[case("TEST3@EXAMPLE.COM", "test3@example.com")]
    #[case("test4@example.COM", "test4@example.com")]
    #[case("  padded@example.com  ", "padded@example.com")]
    fn email_is_normalised(#[case] raw: &str, #[case] expected: &str) {
        let email = Email::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("   ", UserValidationError::EmptyEmail)]
    #[case("no-at-sign", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("user@", UserValidationError::InvalidEmail)]
    #[case("a@b@c", UserValidationError::InvalidEmail)]
    #[case("spaced out@example.com", UserValidationError::InvalidEmail)]
    fn invalid_emails_are_rejected(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Email::new(raw), Err(expected));
    }

    #[rstest]
    fn overly_long_email_is_rejected() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            Email::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    fn name_is_trimmed_and_bounded() {
        assert_eq!(UserName::new("  Ada ").expect("name").as_ref(), "Ada");
        assert!(UserName::new("").is_ok());
        assert_eq!(
            UserName::new("x".repeat(USER_NAME_MAX + 1)),
            Err(UserValidationError::NameTooLong {
                max: USER_NAME_MAX
            })
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-uuid")]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    fn user_id_rejects_invalid_input(#[case] raw: &str) {
        assert!(UserId::new(raw).is_err());
    }

    #[rstest]
    fn superuser_role_sets_staff_and_superuser() {
        let flags = UserFlags::for_role(UserRole::Superuser);
        assert!(flags.is_active && flags.is_staff && flags.is_superuser);
        let member = UserFlags::for_role(UserRole::Member);
        assert!(member.is_active && !member.is_staff && !member.is_superuser);
    }

    #[rstest]
    fn check_password_verifies_plain_text() {
        let password = Password::new("testpass123").expect("password");
        let user = User::new(
            UserId::random(),
            Email::new("test@example.com").expect("email"),
            UserName::default(),
            PasswordHash::generate(&password).expect("hash"),
            UserFlags::for_role(UserRole::Member),
        );

        assert!(user.check_password("testpass123"));
        assert!(!user.check_password("wrong-pass"));
    }
}
