//! Adapter for the `validator` crate
//!
//! Converts [`validator::ValidationErrors`] into engine-neutral
//! [`FieldFailure`]s. Nested structs are reported as `parent.child` and list
//! entries as `items[0].name`. Failures are sorted by field name.

use crate::errors::ValidationErrors;
use crate::formatter::{FieldFailure, format_validation_errors};
use serde_json::Value;
use validator::{ValidationError as EngineError, ValidationErrors as EngineErrors, ValidationErrorsKind};

/// Flatten engine errors into failures sorted by field name
pub fn field_failures(errors: &EngineErrors) -> Vec<FieldFailure> {
    let mut failures = Vec::new();
    collect(errors, "", &mut failures);
    failures.sort_by(|a, b| a.field.cmp(&b.field));
    failures
}

/// Format engine errors into [`ValidationErrors`]
pub fn from_validator(errors: &EngineErrors) -> ValidationErrors {
    format_validation_errors(&field_failures(errors))
}

impl From<&EngineErrors> for ValidationErrors {
    fn from(errors: &EngineErrors) -> Self {
        from_validator(errors)
    }
}

impl From<EngineErrors> for ValidationErrors {
    fn from(errors: EngineErrors) -> Self {
        from_validator(&errors)
    }
}

fn collect(errors: &EngineErrors, prefix: &str, out: &mut Vec<FieldFailure>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                out.extend(list.iter().map(|error| failure(&path, error)));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, out),
            ValidationErrorsKind::List(entries) => {
                for (index, inner) in entries {
                    collect(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn failure(field: &str, error: &EngineError) -> FieldFailure {
    let value = error.params.get("value").map(display).unwrap_or_default();
    let param = |name: &str| error.params.get(name).map(display);

    let (tag, bound) = match &*error.code {
        "length" => length_tag(error),
        "range" => range_tag(error),
        code => (code.to_string(), None),
    };

    let mut failure = FieldFailure::new(field, tag).with_value(value);
    if let Some(bound) = bound.and_then(|name| param(name)) {
        failure = failure.with_param(bound);
    }
    failure
}

/// `len` for exact lengths, otherwise whichever bound the value breaks.
///
/// A value that cannot be measured against two bounds keeps the raw
/// `length` code.
fn length_tag(error: &EngineError) -> (String, Option<&'static str>) {
    if error.params.contains_key("equal") {
        return ("len".to_string(), Some("equal"));
    }

    let length = error.params.get("value").and_then(|v| match v {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        _ => None,
    });
    let bound = |name: &str| error.params.get(name).and_then(Value::as_f64);

    let candidates = [
        ("min", length.zip(bound("min")).map(|(l, b)| l < b)),
        ("max", length.zip(bound("max")).map(|(l, b)| l > b)),
    ];
    violated_bound(error, &candidates, "length")
}

/// `gte`/`lte` for inclusive bounds, `gt`/`lt` for exclusive ones.
///
/// A non-numeric value checked against both a lower and an upper bound
/// keeps the raw `range` code.
fn range_tag(error: &EngineError) -> (String, Option<&'static str>) {
    let value = error.params.get("value").and_then(Value::as_f64);
    let bound = |name: &str| error.params.get(name).and_then(Value::as_f64);
    let check = |name: &str, broken: fn(f64, f64) -> bool| value.zip(bound(name)).map(|(v, b)| broken(v, b));

    let candidates = [
        ("min", check("min", |v, b| v < b)),
        ("exclusive_min", check("exclusive_min", |v, b| v <= b)),
        ("max", check("max", |v, b| v > b)),
        ("exclusive_max", check("exclusive_max", |v, b| v >= b)),
    ];
    let (tag, param) = violated_bound(error, &candidates, "range");
    let tag = match param {
        Some("min") => "gte",
        Some("exclusive_min") => "gt",
        Some("max") => "lte",
        Some("exclusive_max") => "lt",
        _ => return (tag, None),
    };
    (tag.to_string(), param)
}

/// The bound a failure reports.
///
/// `candidates` pairs each bound parameter with whether the value is known
/// to break it. A known violation wins; otherwise the only bound present is
/// used, and with several present the failure falls back to `code`.
fn violated_bound(
    error: &EngineError,
    candidates: &[(&'static str, Option<bool>)],
    code: &str,
) -> (String, Option<&'static str>) {
    if let Some((name, _)) = candidates.iter().find(|(_, broken)| *broken == Some(true)) {
        return (name.to_string(), Some(*name));
    }

    let mut present = candidates.iter().filter(|(name, _)| error.params.contains_key(*name));
    match (present.next(), present.next()) {
        (Some((name, _)), None) => (name.to_string(), Some(*name)),
        _ => (code.to_string(), None),
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
