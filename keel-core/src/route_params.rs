//! Route parameters
//!
//! Parameter descriptors attached to routes, plus the extractor that
//! derives default descriptors from a path template.
//!
//! Path templates mark positional parameters with a `:` prefix on a whole
//! segment, e.g. `/users/:id/posts/:post_id`.

use crate::logging::trace;
use crate::schema::{ExampleValue, Schema};
use std::fmt;

// ============================================================================
// Parameter descriptors
// ============================================================================

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Body => "body",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "body" => Some(ParameterLocation::Body),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload description attached to a body parameter
#[derive(Debug, Clone, PartialEq)]
pub enum BodySchema {
    /// Example value, synthesized into a schema when the document is built
    Example(ExampleValue),
    /// Schema declared by hand
    Schema(Schema),
}

/// One documented input of an operation.
///
/// Body parameters carry a [`BodySchema`] and no type; every other location
/// is described by `param_type` and `format`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub param_type: String,
    pub format: Option<String>,
    pub required: bool,
    pub description: String,
    pub body: Option<BodySchema>,
}

impl Parameter {
    /// A non-body parameter. A `Body` location gets an empty object schema.
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        param_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let body = (location == ParameterLocation::Body).then(|| BodySchema::Schema(Schema::object()));
        Self {
            name: name.into(),
            location,
            param_type: if body.is_some() {
                String::new()
            } else {
                param_type.into()
            },
            format: None,
            required,
            description: description.into(),
            body,
        }
    }

    /// Required path parameter
    pub fn path(name: impl Into<String>, param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, ParameterLocation::Path, param_type, description, true)
    }

    pub fn query(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self::new(name, ParameterLocation::Query, param_type, description, required)
    }

    pub fn header(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        Self::new(name, ParameterLocation::Header, param_type, description, required)
    }

    /// The required `body` parameter
    pub fn body(body: BodySchema, description: impl Into<String>) -> Self {
        Self {
            name: "body".to_string(),
            location: ParameterLocation::Body,
            param_type: String::new(),
            format: None,
            required: true,
            description: description.into(),
            body: Some(body),
        }
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

// ============================================================================
// Extraction
// ============================================================================

/// Name of the positional parameter in a path segment, if it is one
fn positional_name(segment: &str) -> Option<&str> {
    segment.strip_prefix(':').filter(|name| !name.is_empty())
}

/// Default parameters for every `:name` segment of a path template.
///
/// `id`, `userId` and `user_id` are documented as `integer`/`int64`; any
/// other name is a `string`. All are required path parameters.
pub fn extract_path_parameters(path: &str) -> Vec<Parameter> {
    let params: Vec<Parameter> = path
        .split('/')
        .filter_map(positional_name)
        .map(|name| match name {
            "id" => Parameter::path(name, "integer", "Resource ID").with_format("int64"),
            "userId" | "user_id" => Parameter::path(name, "integer", "User ID").with_format("int64"),
            _ => Parameter::path(name, "string", format!("Parameter {}", name)),
        })
        .collect();

    trace!(path = path, count = params.len(), "Extracted path parameters");
    params
}

/// Rewrite `:name` segments as `{name}`
pub fn to_openapi_path(path: &str) -> String {
    path.split('/')
        .map(|segment| match positional_name(segment) {
            Some(name) => format!("{{{}}}", name),
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
