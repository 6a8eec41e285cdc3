// Query and path parameter helpers

use crate::errors::{ValidationError, ValidationErrors};
use keel_core::logging::{debug, trace};
use keel_core::{Error, RequestContext};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A parsed query value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            QueryValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            QueryValue::Float(n) => Some(*n),
            QueryValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            QueryValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Bool(b) => write!(f, "{}", b),
            QueryValue::Int(n) => write!(f, "{}", n),
            QueryValue::Float(n) => write!(f, "{}", n),
            QueryValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Int(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Float(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

/// Declared query parameter
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParam {
    pub name: String,
    /// One of `string`, `int`, `int64`, `float64`, `bool`; anything else is
    /// passed through as the raw string
    pub param_type: String,
    pub required: bool,
    pub default: Option<QueryValue>,
    pub description: String,
    pub example: Option<QueryValue>,
}

impl QueryParam {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            required: false,
            default: None,
            description: String::new(),
            example: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<QueryValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<QueryValue>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// Declared path parameter
#[derive(Debug, Clone, PartialEq)]
pub struct PathParam {
    pub name: String,
    pub param_type: String,
    pub description: String,
    pub example: Option<QueryValue>,
}

impl PathParam {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: String::new(),
            example: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_example(mut self, example: impl Into<QueryValue>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// Split a raw query string into name -> values, keeping repeat order
pub fn parse_query_string(query: &str) -> Result<HashMap<String, Vec<String>>, Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query.trim_start_matches('?'))
        .map_err(|e| Error::BadRequest(format!("Invalid query string: {}", e)))?;

    let mut values: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in pairs {
        values.entry(name).or_default().push(value);
    }
    Ok(values)
}

/// Parse declared parameters out of raw query values.
///
/// Only the first value of a repeated name is used. Missing optional
/// parameters take their default, or are left out when they have none.
/// All failures are collected before returning.
pub fn parse_query_params(
    values: &HashMap<String, Vec<String>>,
    params: &[QueryParam],
) -> Result<HashMap<String, QueryValue>, ValidationErrors> {
    let mut parsed = HashMap::new();
    let mut errors = ValidationErrors::default();

    for param in params {
        let raw = values
            .get(&param.name)
            .and_then(|v| v.first())
            .filter(|v| !v.is_empty());

        let Some(raw) = raw else {
            if param.required {
                errors.add(ValidationError::new(
                    &param.name,
                    "required",
                    format!("query parameter '{}' is required", param.name),
                ));
            } else if let Some(default) = &param.default {
                parsed.insert(param.name.clone(), default.clone());
            }
            continue;
        };

        match parse_value(raw, &param.param_type) {
            Some(value) => {
                trace!(param = %param.name, value = %value, "Parsed query parameter");
                parsed.insert(param.name.clone(), value);
            }
            None => errors.add(
                ValidationError::new(
                    &param.name,
                    "type",
                    format!("query parameter '{}' must be of type {}", param.name, param.param_type),
                )
                .with_value(raw.as_str()),
            ),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        debug!(failures = errors.len(), "Query parameter validation failed");
        Err(errors)
    }
}

/// [`parse_query_params`] over the query of a request
pub fn parse_request_query(
    ctx: &RequestContext,
    params: &[QueryParam],
) -> Result<HashMap<String, QueryValue>, ValidationErrors> {
    parse_query_params(&ctx.query_params, params)
}

fn parse_value(raw: &str, param_type: &str) -> Option<QueryValue> {
    match param_type {
        "int" | "int64" => raw.parse::<i64>().ok().map(QueryValue::Int),
        "float64" => raw.parse::<f64>().ok().map(QueryValue::Float),
        "bool" => parse_bool(raw).map(QueryValue::Bool),
        _ => Some(QueryValue::String(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
