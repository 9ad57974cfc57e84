//! User data model.
//!
//! Identifiers are positive integers. A stored identifier below `1` marks an
//! absent row, so [`UserId`] can only be built from values `>= 1` and a
//! [`User`] read back from a store exposes its raw id for the structural
//! check in [`User::stored_id`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

const USERNAME_MIN: usize = 2;
const USERNAME_MAX: usize = 32;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 128;
const DEPARTMENT_MAX: usize = 64;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// Identifier was zero or negative.
    #[error("user id must be a positive integer")]
    NonPositiveId,
    /// Identifier text was not an integer.
    #[error("user id must be an integer")]
    MalformedId,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username outside the permitted length.
    #[error("username must be between {min} and {max} characters")]
    UsernameLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Username contained characters outside the allowed set.
    #[error("username may only contain letters, digits, '_', '-' or '.'")]
    UsernameCharacters,
    /// Password outside the permitted length.
    #[error("password must be between {min} and {max} characters")]
    PasswordLength {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Department reference was blank.
    #[error("department must not be empty")]
    EmptyDepartment,
    /// Department reference longer than allowed.
    #[error("department must be at most {max} characters")]
    DepartmentTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Status outside the closed set.
    #[error("status must be one of: enabled, disabled")]
    UnknownStatus,
}

/// Positive user identifier.
///
/// # Examples
/// ```
/// use zeus_backend::domain::UserId;
///
/// assert!(UserId::new(0).is_err());
/// assert_eq!(UserId::new(42).map(|id| id.get()), Ok(42));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

impl UserId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    /// Returns [`UserValidationError::NonPositiveId`] for values below `1`.
    pub const fn new(raw: i64) -> Result<Self, UserValidationError> {
        if raw < 1 {
            return Err(UserValidationError::NonPositiveId);
        }
        Ok(Self(raw))
    }

    /// Structural check used on identifiers handed back by a store.
    #[must_use]
    pub const fn from_stored(raw: i64) -> Option<Self> {
        if raw < 1 { None } else { Some(Self(raw)) }
    }

    /// The raw integer.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<i64>()
            .map_err(|_| UserValidationError::MalformedId)?;
        Self::new(raw)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login name, unique per store.
///
/// ## Invariants
/// - Trimmed, 2 to 32 characters.
/// - Letters, digits, `_`, `-` and `.` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when the value is blank, has the wrong
    /// length, or contains disallowed characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(UserValidationError::UsernameCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New credential material.
///
/// The value is zeroised on drop and never shown by `Debug`. Whitespace is
/// preserved so credential comparisons are not surprising.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate the length of a candidate password.
    ///
    /// # Errors
    /// Returns [`UserValidationError::PasswordLength`] when the value is too
    /// short or too long.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let length = raw.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(UserValidationError::PasswordLength {
                min: PASSWORD_MIN,
                max: PASSWORD_MAX,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret to a hashing adapter.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Department reference a user belongs to.
///
/// Accepts either a JSON string or a JSON integer; integers are kept as
/// their decimal text.
///
/// # Examples
/// ```
/// use zeus_backend::domain::DepartmentId;
///
/// let dept: DepartmentId = serde_json::from_str("7").expect("integer form");
/// assert_eq!(dept.as_str(), "7");
/// let dept: DepartmentId = serde_json::from_str("\" eng \"").expect("string form");
/// assert_eq!(dept.as_str(), "eng");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DepartmentRepr", into = "String")]
pub struct DepartmentId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum DepartmentRepr {
    Number(i64),
    Text(String),
}

impl DepartmentId {
    /// Validate and construct a department reference.
    ///
    /// # Errors
    /// Returns [`UserValidationError`] when blank or too long.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDepartment);
        }
        if trimmed.chars().count() > DEPARTMENT_MAX {
            return Err(UserValidationError::DepartmentTooLong {
                max: DEPARTMENT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the reference.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<DepartmentRepr> for DepartmentId {
    type Error = UserValidationError;

    fn try_from(value: DepartmentRepr) -> Result<Self, Self::Error> {
        match value {
            DepartmentRepr::Number(n) => Self::new(n.to_string()),
            DepartmentRepr::Text(s) => Self::new(s),
        }
    }
}

impl From<DepartmentId> for String {
    fn from(value: DepartmentId) -> Self {
        value.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// The account may sign in.
    #[default]
    Enabled,
    /// The account is locked out.
    Disabled,
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            _ => Err(UserValidationError::UnknownStatus),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}

/// Permission code resolved for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Wrap a permission code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Borrow the permission code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// User read model returned by a store.
///
/// Credential material is never part of this type.
///
/// ## Serialisation
/// camelCase keys; timestamps as RFC 3339 strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Raw stored identifier; below `1` means the row is absent.
    pub id: i64,
    /// Login name.
    pub username: Username,
    /// Full name shown in the admin console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Owning department.
    pub department_id: DepartmentId,
    /// Account status.
    pub status: UserStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The identifier if the row is present.
    #[must_use]
    pub const fn stored_id(&self) -> Option<UserId> {
        UserId::from_stored(self.id)
    }
}
