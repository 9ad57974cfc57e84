//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps each
//! [`ErrorCode`] to a status code and serialises [`Error`] as the failure
//! shape of the response envelope: `{"code": 10004, "msg": "..."}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

use super::TraceId;

/// Stable failure kinds surfaced by the user administration endpoints.
///
/// Each kind has a fixed numeric wire value so clients can branch on the
/// envelope `code` without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(into = "u32", try_from = "u32")]
pub enum ErrorCode {
    /// The request could not be bound or failed validation.
    ValidationFailed,
    /// Creating a user did not yield a valid identifier.
    CreateFailed,
    /// An update, including a bulk department move, did not take effect.
    EditFailed,
    /// The identifier does not resolve to a user.
    NoSuchUser,
    /// Deleting a user removed nothing.
    DeleteFailed,
    /// A collaborator could not be reached.
    ServiceUnavailable,
    /// An unexpected failure inside the service.
    InternalError,
}

impl ErrorCode {
    /// Numeric value written to the envelope `code` field.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::ValidationFailed => 10001,
            Self::CreateFailed => 10002,
            Self::EditFailed => 10003,
            Self::NoSuchUser => 10004,
            Self::DeleteFailed => 10005,
            Self::InternalError => 10500,
            Self::ServiceUnavailable => 10503,
        }
    }

    /// Message used when a caller does not provide one.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::ValidationFailed => "invalid request",
            Self::CreateFailed => "failed to create user",
            Self::EditFailed => "failed to update user",
            Self::NoSuchUser => "user does not exist",
            Self::DeleteFailed => "failed to delete user",
            Self::ServiceUnavailable => "service temporarily unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u32 {
    fn from(code: ErrorCode) -> Self {
        code.as_u32()
    }
}

/// Raised when decoding a numeric code that is not part of the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
#[error("unknown error code {0}")]
pub struct UnknownErrorCode(pub u32);

impl TryFrom<u32> for ErrorCode {
    type Error = UnknownErrorCode;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            10001 => Ok(Self::ValidationFailed),
            10002 => Ok(Self::CreateFailed),
            10003 => Ok(Self::EditFailed),
            10004 => Ok(Self::NoSuchUser),
            10005 => Ok(Self::DeleteFailed),
            10500 => Ok(Self::InternalError),
            10503 => Ok(Self::ServiceUnavailable),
            other => Err(UnknownErrorCode(other)),
        }
    }
}

/// Validation errors emitted by [`Error::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    /// The message was blank once trimmed.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Failure payload returned by domain services and ports.
///
/// ## Invariants
/// - `message` is non-empty once trimmed.
/// - `trace_id` is captured from the task-local [`TraceId`] on construction.
///
/// # Examples
/// ```
/// use zeus_backend::domain::{Error, ErrorCode};
///
/// let err = Error::no_such_user();
/// assert_eq!(err.code(), ErrorCode::NoSuchUser);
/// assert_eq!(err.message(), "user does not exist");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

impl Error {
    /// Create an error, falling back to the code's default message when the
    /// supplied one is blank.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::bare(code))
    }

    /// Fallible constructor that rejects blank messages.
    ///
    /// # Errors
    /// Returns [`ErrorValidationError::EmptyMessage`] for blank messages.
    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    fn bare(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_owned(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable failure kind.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier captured when the error was raised.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured details, typically the offending field.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details.
    ///
    /// # Examples
    /// ```
    /// use zeus_backend::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::validation_failed("bad id").with_details(json!({ "field": "id" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// [`ErrorCode::NoSuchUser`] with its default message.
    #[must_use]
    pub fn no_such_user() -> Self {
        Self::bare(ErrorCode::NoSuchUser)
    }

    /// [`ErrorCode::CreateFailed`] with its default message.
    #[must_use]
    pub fn create_failed() -> Self {
        Self::bare(ErrorCode::CreateFailed)
    }

    /// [`ErrorCode::EditFailed`] with its default message.
    #[must_use]
    pub fn edit_failed() -> Self {
        Self::bare(ErrorCode::EditFailed)
    }

    /// [`ErrorCode::DeleteFailed`] with its default message.
    #[must_use]
    pub fn delete_failed() -> Self {
        Self::bare(ErrorCode::DeleteFailed)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            msg: value.message,
            trace_id: value.trace_id,
            details: value.details,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        let ErrorDto {
            code,
            msg,
            trace_id,
            details,
        } = value;
        let mut error = Self::try_new(code, msg)?;
        error.trace_id = trace_id;
        error.details = details;
        Ok(error)
    }
}
