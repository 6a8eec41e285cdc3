// Validation errors

use keel_core::HttpResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminator carried by every validation error response
pub const VALIDATION_ERROR_TYPE: &str = "validation_error";

/// Validation error for a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field name that failed validation
    pub field: String,

    /// Constraint that failed, e.g. `required` or `min`
    pub tag: String,

    /// Offending value in string form; empty when unknown
    pub value: String,

    /// Human-readable message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            value: String::new(),
            message: message.into(),
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors.
///
/// Usable as a single error whose message joins the individual messages
/// with `"; "`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Errors reported for `field`
    pub fn get_field_errors(&self, field: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// `Ok(())` when empty, otherwise `Err(self)`
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Wire form of these errors
    pub fn to_error_response(&self) -> ValidationErrorResponse {
        ValidationErrorResponse {
            detail: self
                .errors
                .iter()
                .map(|e| ValidationDetail {
                    field: e.field.clone(),
                    message: e.message.clone(),
                    value: (!e.value.is_empty()).then(|| e.value.clone()),
                })
                .collect(),
            error_type: VALIDATION_ERROR_TYPE.to_string(),
        }
    }

    /// 400 response carrying [`Self::to_error_response`]
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::bad_request()
            .with_json(&self.to_error_response())
            .unwrap_or_else(|_| HttpResponse::bad_request())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            f.write_str(&error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

impl From<ValidationErrors> for keel_core::Error {
    fn from(errors: ValidationErrors) -> Self {
        keel_core::Error::Validation(errors.to_string())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

/// One entry of a validation error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// `{"detail": [{field, message, value?}], "type": "validation_error"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub detail: Vec<ValidationDetail>,
    #[serde(rename = "type")]
    pub error_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn errors() -> ValidationErrors {
        vec![
            ValidationError::new("email", "required", "field 'email' is required"),
            ValidationError::new("age", "gte", "field 'age' must be greater than or equal to 18")
                .with_value("12"),
        ]
        .into()
    }

    #[test]
    fn test_display_joins_messages() {
        assert_eq!(
            errors().to_string(),
            "field 'email' is required; field 'age' must be greater than or equal to 18"
        );
        assert_eq!(ValidationErrors::default().to_string(), "");
    }

    #[test]
    fn test_wire_shape() {
        let body = serde_json::to_value(errors().to_error_response()).unwrap();
        assert_eq!(
            body,
            json!({
                "detail": [
                    {"field": "email", "message": "field 'email' is required"},
                    {"field": "age", "message": "field 'age' must be greater than or equal to 18", "value": "12"}
                ],
                "type": "validation_error"
            })
        );
    }

    #[test]
    fn test_to_response_is_bad_request() {
        let resp = errors().to_response();
        assert_eq!(resp.status, 400);
        let body: ValidationErrorResponse = resp.json().unwrap();
        assert_eq!(body.detail.len(), 2);
        assert_eq!(body.error_type, VALIDATION_ERROR_TYPE);
    }

    #[test]
    fn test_into_core_error() {
        let err: keel_core::Error = errors().into();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_type(), "validation_error");
    }

    #[test]
    fn test_field_lookup() {
        let errors = errors();
        assert_eq!(errors.get_field_errors("age").len(), 1);
        assert!(errors.get_field_errors("name").is_empty());
        assert!(ValidationErrors::default().into_result().is_ok());
    }
}
