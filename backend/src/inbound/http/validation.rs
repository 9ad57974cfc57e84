//! Request binding and validation helpers for inbound HTTP adapters.
//!
//! Every rejection becomes a `ValidationFailed` error whose details name the
//! offending field and a stable machine code, so malformed input never
//! reaches a domain port.

use std::num::IntErrorKind;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{DepartmentId, Error, UserId, UserValidationError};

const TEXT_FIELD_MAX: usize = 64;
const EMAIL_MAX: usize = 254;
const MOBILE_MIN: usize = 5;
const MOBILE_MAX: usize = 20;

/// Machine-readable validation codes placed in error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    MalformedPayload,
    InvalidId,
    InvalidIdList,
    InvalidInteger,
    InvalidUsername,
    InvalidPassword,
    InvalidDepartment,
    InvalidStatus,
    InvalidEmail,
    InvalidMobile,
    TooLong,
    EmptyPatch,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::MalformedPayload => "malformed_payload",
            Self::InvalidId => "invalid_id",
            Self::InvalidIdList => "invalid_id_list",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidUsername => "invalid_username",
            Self::InvalidPassword => "invalid_password",
            Self::InvalidDepartment => "invalid_department",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidMobile => "invalid_mobile",
            Self::TooLong => "too_long",
            Self::EmptyPatch => "empty_patch",
        }
    }

    const fn for_user_error(err: &UserValidationError) -> Self {
        match err {
            UserValidationError::NonPositiveId | UserValidationError::MalformedId => {
                Self::InvalidId
            }
            UserValidationError::EmptyUsername
            | UserValidationError::UsernameLength { .. }
            | UserValidationError::UsernameCharacters => Self::InvalidUsername,
            UserValidationError::PasswordLength { .. } => Self::InvalidPassword,
            UserValidationError::EmptyDepartment
            | UserValidationError::DepartmentTooLong { .. } => Self::InvalidDepartment,
            UserValidationError::UnknownStatus => Self::InvalidStatus,
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::validation_failed(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::validation_failed(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::validation_failed(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn empty_patch_error() -> Error {
    ValidationError::new(FieldName::new("body"), "at least one field must be provided")
        .with_code(ErrorCode::EmptyPatch)
}

/// Wrap a value-type rejection with its field name.
pub(crate) fn user_field_error(field: FieldName, err: &UserValidationError) -> Error {
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::for_user_error(err))
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse a path or body identifier.
pub(crate) fn parse_user_id(raw: &str, field: FieldName) -> Result<UserId, Error> {
    raw.parse::<UserId>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidId, raw)
    })
}

/// Parse an identifier that names a row expected to exist.
///
/// Integers below `1` can never match a stored row, so they produce the
/// operation's absence error instead of a validation failure.
pub(crate) fn parse_existing_user_id(
    raw: &str,
    field: FieldName,
    absent: fn() -> Error,
) -> Result<UserId, Error> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < 1 => Err(absent()),
        _ => parse_user_id(raw, field),
    }
}

/// Split a comma-joined identifier list into discrete identifiers.
///
/// Whitespace around tokens is tolerated; empty tokens, non-integers and
/// values below `1` are rejected with the index of the offending token.
pub(crate) fn parse_user_id_list(raw: &str, field: FieldName) -> Result<Vec<UserId>, Error> {
    if raw.trim().is_empty() {
        return Err(missing_field_error(field));
    }
    raw.split(',')
        .enumerate()
        .map(|(index, token)| {
            let token = token.trim();
            if token.is_empty() {
                return Err(ValidationError::new(field, "user id list contains an empty entry")
                    .with_index(ErrorCode::InvalidIdList, index, token));
            }
            token.parse::<UserId>().map_err(|err| {
                ValidationError::new(field, format!("entry {index}: {err}")).with_index(
                    ErrorCode::InvalidIdList,
                    index,
                    token,
                )
            })
        })
        .collect()
}

/// Accept either a comma-joined string or a JSON array of integers.
pub(crate) fn parse_user_id_list_value(
    value: Value,
    field: FieldName,
) -> Result<Vec<UserId>, Error> {
    match value {
        Value::String(raw) => parse_user_id_list(&raw, field),
        Value::Array(items) if !items.is_empty() => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_i64()
                    .and_then(UserId::from_stored)
                    .ok_or_else(|| {
                        ValidationError::new(
                            field,
                            format!("entry {index}: user id must be a positive integer"),
                        )
                        .with_index(ErrorCode::InvalidIdList, index, item.to_string())
                    })
            })
            .collect(),
        Value::Array(_) => Err(missing_field_error(field)),
        other => Err(ValidationError::new(
            field,
            "user ids must be a comma-separated string or an array of integers",
        )
        .with_value(ErrorCode::InvalidIdList, other.to_string())),
    }
}

/// Accept a department as a JSON string or integer.
pub(crate) fn parse_department_value(
    value: Value,
    field: FieldName,
) -> Result<DepartmentId, Error> {
    let raw = match value {
        Value::String(text) => text,
        Value::Number(number) if number.is_i64() => number.to_string(),
        other => {
            return Err(ValidationError::new(field, "department must be a string or an integer")
                .with_value(ErrorCode::InvalidDepartment, other.to_string()));
        }
    };
    DepartmentId::new(&raw).map_err(|err| user_field_error(field, &err))
}

/// Parse an optional integer query parameter.
pub(crate) fn parse_optional_integer(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<i64>, Error> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<i64>().or_else(|err| match err.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(ValidationError::new(
                    field,
                    format!("{} must be an integer", field.as_str()),
                )
                .with_value(ErrorCode::InvalidInteger, value)),
            })
        })
        .transpose()
}

/// Trim free text; blank input counts as absent.
pub(crate) fn parse_optional_text(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<String>, Error> {
    let Some(text) = normalise(raw) else {
        return Ok(None);
    };
    if text.chars().count() > TEXT_FIELD_MAX {
        return Err(ValidationError::new(
            field,
            format!("{} must be at most {TEXT_FIELD_MAX} characters", field.as_str()),
        )
        .with_code(ErrorCode::TooLong));
    }
    Ok(Some(text))
}

pub(crate) fn parse_optional_email(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<String>, Error> {
    let Some(email) = normalise(raw) else {
        return Ok(None);
    };
    let well_formed = email.len() <= EMAIL_MAX
        && !email.chars().any(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if !well_formed {
        return Err(ValidationError::new(field, "email must be a valid address")
            .with_value(ErrorCode::InvalidEmail, email));
    }
    Ok(Some(email))
}

pub(crate) fn parse_optional_mobile(
    raw: Option<String>,
    field: FieldName,
) -> Result<Option<String>, Error> {
    let Some(mobile) = normalise(raw) else {
        return Ok(None);
    };
    let digits = mobile.chars().filter(char::is_ascii_digit).count();
    let allowed = mobile
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
    if !allowed || !(MOBILE_MIN..=MOBILE_MAX).contains(&digits) {
        return Err(ValidationError::new(
            field,
            format!("mobile must contain {MOBILE_MIN} to {MOBILE_MAX} digits"),
        )
        .with_value(ErrorCode::InvalidMobile, mobile));
    }
    Ok(Some(mobile))
}

fn normalise(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn malformed_payload_error(source: &'static str, reason: &impl std::fmt::Display) -> Error {
    debug!(source, %reason, "request payload rejected by extractor");
    ValidationError::new(FieldName::new(source), format!("malformed {source}: {reason}"))
        .with_code(ErrorCode::MalformedPayload)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed_payload_error("body", &err).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    malformed_payload_error("query", &err).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    malformed_payload_error("path", &err).into()
}

/// Route extractor failures through the `ValidationFailed` envelope.
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler));
}
