//! Shared validation helpers for inbound HTTP adapters.
//!
//! Query strings and path segments arrive as raw strings so that every parse
//! failure becomes a `400` with `{field, code, value}` details instead of the
//! framework's default rejection.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use pagination::{PageParamError, PageRequest};
use serde_json::json;

use crate::domain::{AppointmentStatus, Error, Role, Specialization, TimeOfDay};

/// Message returned for any malformed calendar date.
pub(crate) const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidId,
    InvalidDate,
    InvalidTime,
    InvalidTimestamp,
    InvalidNumber,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidTime => "invalid_time",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::InvalidNumber => "invalid_number",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
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
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} is required")).with_code(ErrorCode::MissingField)
}

/// Turn a domain validation failure into a `400` pinned to `field`.
pub(crate) fn invalid_field(field: FieldName, err: impl Display) -> Error {
    ValidationError::new(field, err.to_string()).with_code(ErrorCode::InvalidValue)
}

/// Require an optional body field.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

/// Parse a positive integer identifier and convert it to a typed id.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: TryFrom<i64>,
{
    let name = field.as_str();
    value
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|raw| T::try_from(raw).ok())
        .ok_or_else(|| {
            ValidationError::new(field, format!("{name} must be a positive integer"))
                .with_value(ErrorCode::InvalidId, value)
        })
}

/// Parse the `{id}` path segment.
pub(crate) fn path_id<T>(raw: &str) -> Result<T, Error>
where
    T: TryFrom<i64>,
{
    parse_id(raw, FieldName::new("id"))
}

pub(crate) fn parse_optional_id<T>(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: TryFrom<i64>,
{
    blank_to_none(value)
        .map(|raw| parse_id(&raw, field))
        .transpose()
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::new(field, INVALID_DATE_MESSAGE).with_value(ErrorCode::InvalidDate, value)
    })
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<NaiveDate>, Error> {
    blank_to_none(value)
        .map(|raw| parse_date(&raw, field))
        .transpose()
}

pub(crate) fn parse_time(value: &str, field: FieldName) -> Result<TimeOfDay, Error> {
    value.parse::<TimeOfDay>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidTime, value)
    })
}

pub(crate) fn parse_rfc3339_timestamp(
    value: &str,
    field: FieldName,
) -> Result<DateTime<Utc>, Error> {
    let name = field.as_str();
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            ValidationError::new(field, format!("{name} must be an RFC 3339 timestamp"))
                .with_value(ErrorCode::InvalidTimestamp, value)
        })
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<AppointmentStatus, Error> {
    value.parse::<AppointmentStatus>().map_err(|err| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidValue, value)
    })
}

pub(crate) fn parse_optional_status(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<AppointmentStatus>, Error> {
    blank_to_none(value)
        .map(|raw| parse_status(&raw, field))
        .transpose()
}

pub(crate) fn parse_optional_role(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Role>, Error> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<Role>().map_err(|err| {
                ValidationError::new(field, err.to_string())
                    .with_value(ErrorCode::InvalidValue, raw.as_str())
            })
        })
        .transpose()
}

pub(crate) fn parse_optional_specialization(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Specialization>, Error> {
    blank_to_none(value)
        .map(|raw| {
            raw.parse::<Specialization>().map_err(|err| {
                ValidationError::new(field, err.to_string())
                    .with_value(ErrorCode::InvalidValue, raw.as_str())
            })
        })
        .transpose()
}

pub(crate) fn parse_optional_bool(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<bool>, Error> {
    let name = field.as_str();
    blank_to_none(value)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(
                ValidationError::new(field, format!("{name} must be true or false"))
                    .with_value(ErrorCode::InvalidValue, raw.as_str()),
            ),
        })
        .transpose()
}

/// Parse `page` and `limit`, clamping out-of-range integers.
pub(crate) fn parse_page(page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, Error> {
    PageRequest::parse(page, limit).map_err(|err| {
        let message = err.to_string();
        let PageParamError::NotANumber { name, value } = err;
        ValidationError::new(FieldName::new(name), message)
            .with_value(ErrorCode::InvalidNumber, value)
    })
}
