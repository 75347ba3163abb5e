//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` [`Error`] whose `details` name
//! the offending field and a stable code, for example
//! `{"field": "tags", "code": "invalid_id", "value": "abc"}`.

use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidId => "invalid_id",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
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
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// A field was present but its value was rejected; `reason` is shown to the
/// client as the error message.
pub(crate) fn invalid_field_error(field: FieldName, reason: impl std::fmt::Display) -> Error {
    ValidationError::new(field.as_str(), reason.to_string()).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

fn invalid_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be a comma-separated list of positive integers"),
    )
    .with_value(ErrorCode::InvalidId, value)
}

/// Parse a comma-separated id filter such as `1,2,3`.
///
/// Absent or blank input yields an empty list. Blank segments are skipped;
/// anything else that is not a positive integer is rejected.
pub(crate) fn parse_id_list(raw: Option<&str>, field: FieldName) -> Result<Vec<i64>, Error> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.parse::<i64>() {
            Ok(id) if id > 0 => Ok(id),
            _ => Err(invalid_id_error(field, segment)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const TAGS: FieldName = FieldName::new("tags");

    #[rstest]
    #[case(None, vec![])]
    #[case(Some(""), vec![])]
    #[case(Some("3"), vec![3])]
    #[case(Some("1, 2,,5"), vec![1, 2, 5])]
    fn id_lists_parse(#[case] raw: Option<&str>, #[case] expected: Vec<i64>) {
        assert_eq!(parse_id_list(raw, TAGS).expect("valid list"), expected);
    }

    #[rstest]
    #[case("abc", "abc")]
    #[case("1,0", "0")]
    #[case("-4", "-4")]
    #[case("2,1.5", "1.5")]
    fn bad_ids_name_the_offending_segment(#[case] raw: &str, #[case] offending: &str) {
        let error = parse_id_list(Some(raw), TAGS).expect_err("invalid list");

        assert_eq!(error.code(), DomainCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "tags", "value": offending, "code": "invalid_id"}))
        );
    }

    #[rstest]
    fn missing_fields_report_their_name() {
        let error = require::<String>(None, FieldName::new("title")).expect_err("missing");

        assert_eq!(error.message(), "missing required field: title");
        assert_eq!(
            error.details(),
            Some(&json!({"field": "title", "code": "missing_field"}))
        );
    }
}
