//! User accounts, roles and credential value types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::ids::UserId;

/// Maximum length of a person's name.
pub const NAME_MAX: usize = 100;
/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 255;
/// Minimum length of a plaintext password.
pub const PASSWORD_MIN: usize = 8;

/// Validation errors for user-supplied account fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyName,
    NameTooLong { max: usize },
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    PasswordTooShort { min: usize },
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name is required"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email is required"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::UnknownRole { value } => {
                write!(f, "role must be one of patient, doctor, admin (got '{value}')")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Access role carried in tokens and used to gate route groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    /// Lowercase wire and storage name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Admin => "admin",
        }
    }

    /// Whether accounts with this role may sign themselves up.
    pub fn is_self_registrable(self) -> bool {
        match self {
            Self::Patient | Self::Doctor => true,
            Self::Admin => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::UnknownRole {
                value: s.to_owned(),
            }),
        }
    }
}

/// A person's display name.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a name.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Normalised email address used as the login identifier.
///
/// ## Invariants
/// - Lowercase and trimmed.
/// - Exactly one `@`, a non-empty local part and a dotted domain.
/// - At most [`EMAIL_MAX`] characters.
///
/// # Examples
/// ```
/// use booking_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Jane@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "jane@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = email.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !is_plausible_email(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

fn is_plausible_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let mut labels = domain.split('.');
    let has_dot = domain.contains('.');
    has_dot && labels.all(|label| !label.is_empty())
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Plaintext password held only until it is hashed or verified.
///
/// The buffer is wiped on drop and never printed by `Debug`.
#[derive(Clone)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Wrap a password without applying the strength policy.
    ///
    /// Used for login, where any stored password must remain usable.
    pub fn unchecked(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    /// Wrap a new password after checking it meets [`PASSWORD_MIN`].
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        if password.chars().count() < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(password))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(***)")
    }
}

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub email: EmailAddress,
    /// PHC-formatted Argon2 hash.
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Validation coverage for account value types.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyEmail)]
    #[case("plainaddress", UserValidationError::InvalidEmail)]
    #[case("@example.com", UserValidationError::InvalidEmail)]
    #[case("a@b", UserValidationError::InvalidEmail)]
    #[case("a@@b.com", UserValidationError::InvalidEmail)]
    #[case("a b@c.com", UserValidationError::InvalidEmail)]
    #[case("a@b..com", UserValidationError::InvalidEmail)]
    fn rejects_malformed_emails(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(EmailAddress::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_email() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        assert_eq!(
            EmailAddress::new(raw),
            Err(UserValidationError::EmailTooLong { max: EMAIL_MAX })
        );
    }

    #[rstest]
    #[case("   ", UserValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(PersonName::new(raw), Err(expected));
    }

    #[rstest]
    fn trims_names() {
        let name = PersonName::new("  Dr. Jane Doe ").expect("valid name");
        assert_eq!(name.as_ref(), "Dr. Jane Doe");
    }

    #[rstest]
    #[case("short", false)]
    #[case("exactly8", true)]
    #[case("a much longer passphrase", true)]
    fn password_policy_requires_eight_characters(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(PlainPassword::new(raw).is_ok(), accepted);
    }

    #[rstest]
    fn password_debug_is_redacted() {
        let password = PlainPassword::unchecked("secret-value");
        assert_eq!(format!("{password:?}"), "PlainPassword(***)");
    }

    #[rstest]
    #[case("patient", Role::Patient)]
    #[case("Doctor", Role::Doctor)]
    #[case(" ADMIN ", Role::Admin)]
    fn parses_roles_case_insensitively(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn only_patients_and_doctors_self_register() {
        assert!(Role::Patient.is_self_registrable());
        assert!(Role::Doctor.is_self_registrable());
        assert!(!Role::Admin.is_self_registrable());
        assert!("nurse".parse::<Role>().is_err());
    }
}
