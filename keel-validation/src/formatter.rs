//! Validation error formatting
//!
//! Turns raw field failures reported by a validation engine into
//! [`ValidationErrors`] with readable messages. A fixed set of constraint
//! tags have their own message template:
//!
//! | tag | message |
//! |-----|---------|
//! | `required` | `field '<f>' is required` |
//! | `min` | `field '<f>' must have a minimum value of <p>` |
//! | `max` | `field '<f>' must have a maximum value of <p>` |
//! | `email` | `field '<f>' must be a valid email` |
//! | `url` | `field '<f>' must be a valid URL` |
//! | `len` | `field '<f>' must be exactly <p> characters long` |
//! | `gte` | `field '<f>' must be greater than or equal to <p>` |
//! | `lte` | `field '<f>' must be less than or equal to <p>` |
//!
//! Any other tag gets `field '<f>' failed the '<tag>' validation`.

use crate::errors::{ValidationError, ValidationErrors};
use keel_core::logging::trace;

/// One failed constraint as reported by a validation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: String,
    pub tag: String,
    /// Constraint parameter, e.g. the bound of `min`; empty when none
    pub param: String,
    /// Offending value in string form
    pub value: String,
}

impl FieldFailure {
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tag: tag.into(),
            param: String::new(),
            value: String::new(),
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = param.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Readable message for one failure
pub fn message_for(failure: &FieldFailure) -> String {
    let field = &failure.field;
    let param = &failure.param;
    match failure.tag.as_str() {
        "required" => format!("field '{}' is required", field),
        "min" => format!("field '{}' must have a minimum value of {}", field, param),
        "max" => format!("field '{}' must have a maximum value of {}", field, param),
        "email" => format!("field '{}' must be a valid email", field),
        "url" => format!("field '{}' must be a valid URL", field),
        "len" => format!("field '{}' must be exactly {} characters long", field, param),
        "gte" => format!("field '{}' must be greater than or equal to {}", field, param),
        "lte" => format!("field '{}' must be less than or equal to {}", field, param),
        tag => format!("field '{}' failed the '{}' validation", field, tag),
    }
}

/// Format raw failures, preserving their order. Never fails.
pub fn format_validation_errors<'a, I>(failures: I) -> ValidationErrors
where
    I: IntoIterator<Item = &'a FieldFailure>,
{
    let errors: Vec<_> = failures
        .into_iter()
        .map(|failure| {
            ValidationError::new(&failure.field, &failure.tag, message_for(failure))
                .with_value(&failure.value)
        })
        .collect();
    trace!(count = errors.len(), "Formatted validation failures");
    errors.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(tag: &str, param: &str) -> String {
        message_for(&FieldFailure::new("email", tag).with_param(param))
    }

    #[test]
    fn test_required() {
        let errors = format_validation_errors(&[FieldFailure::new("email", "required")]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].message, "field 'email' is required");
        assert_eq!(errors.errors[0].tag, "required");
        assert_eq!(errors.errors[0].field, "email");
    }

    #[test]
    fn test_each_known_tag() {
        assert_eq!(message("min", "3"), "field 'email' must have a minimum value of 3");
        assert_eq!(message("max", "64"), "field 'email' must have a maximum value of 64");
        assert_eq!(message("email", ""), "field 'email' must be a valid email");
        assert_eq!(message("url", ""), "field 'email' must be a valid URL");
        assert_eq!(message("len", "8"), "field 'email' must be exactly 8 characters long");
        assert_eq!(message("gte", "1"), "field 'email' must be greater than or equal to 1");
        assert_eq!(message("lte", "9"), "field 'email' must be less than or equal to 9");
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(
            message("alphanum", ""),
            "field 'email' failed the 'alphanum' validation"
        );
    }

    #[test]
    fn test_empty_input_yields_no_errors() {
        assert!(format_validation_errors(&[]).is_empty());
    }

    #[test]
    fn test_value_and_order_preserved() {
        let failures = vec![
            FieldFailure::new("name", "min").with_param("2").with_value("a"),
            FieldFailure::new("age", "lte").with_param("130").with_value("200"),
        ];
        let errors = format_validation_errors(&failures);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "age"]);
        assert_eq!(errors.errors[1].value, "200");
    }
}
