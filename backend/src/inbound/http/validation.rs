//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns a domain [`Error`] carrying `details` of the shape
//! `{ "field", "code", "value"? }` so clients can point at the offending
//! input.

use serde_json::json;

use crate::domain::{
    Error, HealthRecordValidationError, LoginValidationError, PatientFilter, PatientId,
    PatientValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidInteger,
    InvalidId,
    BlankField,
    TooLong,
    OutOfRange,
    EmptyUpdate,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::BlankField => "blank_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::EmptyUpdate => "empty_update",
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

pub(crate) const OLDER: FieldName = FieldName::new("older");
pub(crate) const ID: FieldName = FieldName::new("id");

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
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

/// Parse the optional `older` query value into a patient filter.
///
/// Absent means no filter. Anything other than a non-negative integer is a
/// validation failure.
pub(crate) fn parse_age_filter(value: Option<&str>) -> Result<PatientFilter, Error> {
    let Some(raw) = value else {
        return Ok(PatientFilter::all());
    };
    raw.trim()
        .parse::<u32>()
        .map(PatientFilter::older_than)
        .map_err(|_| {
            let field = OLDER.as_str();
            ValidationError::new(field, format!("{field} must be a non-negative integer"))
                .with_value(ErrorCode::InvalidInteger, raw)
        })
}

/// Parse a patient identifier taken from the request path.
pub(crate) fn parse_patient_id(value: &str, field: FieldName) -> Result<PatientId, Error> {
    let field = field.as_str();
    value
        .parse::<i64>()
        .ok()
        .and_then(|raw| PatientId::new(raw).ok())
        .ok_or_else(|| {
            ValidationError::new(field, format!("{field} must be a positive integer"))
                .with_value(ErrorCode::InvalidId, value)
        })
}

/// Map a patient field validation failure onto an HTTP validation error.
pub(crate) fn patient_validation_error(err: PatientValidationError) -> Error {
    let code = match err {
        PatientValidationError::InvalidId => ErrorCode::InvalidId,
        PatientValidationError::BlankField { .. } => ErrorCode::BlankField,
        PatientValidationError::TooLong { .. } => ErrorCode::TooLong,
        PatientValidationError::AgeOutOfRange { .. } => ErrorCode::OutOfRange,
        PatientValidationError::EmptyUpdate => ErrorCode::EmptyUpdate,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

/// Map a login payload validation failure onto an HTTP validation error.
pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let code = match err {
        LoginValidationError::EmptyUsername | LoginValidationError::EmptyPassword => {
            ErrorCode::BlankField
        }
        LoginValidationError::UsernameTooLong => ErrorCode::TooLong,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

/// Map a symptom check validation failure onto an HTTP validation error.
pub(crate) fn health_record_validation_error(err: HealthRecordValidationError) -> Error {
    match err {
        HealthRecordValidationError::TemperatureOutOfRange { value } => {
            ValidationError::new("temperature", err.to_string())
                .with_value(ErrorCode::OutOfRange, value.to_string())
        }
    }
}
