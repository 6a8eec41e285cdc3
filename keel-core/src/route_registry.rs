//! Route registry
//!
//! The ordered list of declared routes and their documentation metadata.
//! Routes are appended during setup and never removed. Metadata is set with
//! [`RouteOption`]s, applied in the order given.
//!
//! # Examples
//!
//! ```
//! use keel_core::{handler, HttpResponse, RouteRegistry};
//! use keel_core::route_registry::{with_summary, with_tags};
//!
//! let mut registry = RouteRegistry::new();
//! registry.get(
//!     "/users/:id",
//!     handler(|_req| async { Ok(HttpResponse::ok()) }),
//!     [with_tags(["users"]), with_summary("Fetch a user")],
//! );
//!
//! assert_eq!(registry.routes()[0].summary, "Fetch a user");
//! ```

use crate::HandlerFn;
use crate::http::HttpMethod;
use crate::logging::{debug, warn};
use crate::route_group::RouteGroup;
use crate::route_params::{BodySchema, Parameter};
use crate::schema::{ExampleValue, Schema};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One declared endpoint
#[derive(Clone)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
    /// Opaque to Keel; only the transport calls it
    pub handler: HandlerFn,
    /// Distinct tags, in first-seen order
    pub tags: Vec<String>,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    /// Status code to description
    pub responses: BTreeMap<u16, String>,
}

impl Route {
    pub fn new(method: HttpMethod, path: impl Into<String>, handler: HandlerFn) -> Self {
        Self {
            method,
            path: path.into(),
            handler,
            tags: Vec::new(),
            summary: String::new(),
            description: String::new(),
            parameters: Vec::new(),
            responses: BTreeMap::new(),
        }
    }

    pub fn apply(&mut self, option: RouteOption) {
        match option {
            RouteOption::Tags(tags) => {
                for tag in tags {
                    if !self.tags.contains(&tag) {
                        self.tags.push(tag);
                    }
                }
            }
            RouteOption::Summary(summary) => self.summary = summary,
            RouteOption::Description(description) => self.description = description,
            RouteOption::Response(status, description) => {
                self.responses.insert(status, description);
            }
            RouteOption::Parameter(parameter) => self.parameters.push(parameter),
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("tags", &self.tags)
            .field("summary", &self.summary)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("responses", &self.responses)
            .finish_non_exhaustive()
    }
}

/// A metadata mutation applied to a route at registration time
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOption {
    /// Append tags, skipping ones already present
    Tags(Vec<String>),
    /// Replace the summary
    Summary(String),
    /// Replace the description
    Description(String),
    /// Set the description for a status code
    Response(u16, String),
    /// Append a parameter
    Parameter(Parameter),
}

pub fn with_tags<I, S>(tags: I) -> RouteOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RouteOption::Tags(tags.into_iter().map(Into::into).collect())
}

pub fn with_summary(summary: impl Into<String>) -> RouteOption {
    RouteOption::Summary(summary.into())
}

pub fn with_description(description: impl Into<String>) -> RouteOption {
    RouteOption::Description(description.into())
}

pub fn with_response(status: u16, description: impl Into<String>) -> RouteOption {
    RouteOption::Response(status, description.into())
}

pub fn with_parameter(parameter: Parameter) -> RouteOption {
    RouteOption::Parameter(parameter)
}

/// Required path parameter
pub fn with_path_parameter(
    name: impl Into<String>,
    param_type: impl Into<String>,
    description: impl Into<String>,
) -> RouteOption {
    RouteOption::Parameter(Parameter::path(name, param_type, description))
}

pub fn with_query_parameter(
    name: impl Into<String>,
    param_type: impl Into<String>,
    description: impl Into<String>,
    required: bool,
) -> RouteOption {
    RouteOption::Parameter(Parameter::query(name, param_type, description, required))
}

/// Required `body` parameter documented from an example value
pub fn with_request_body(example: impl Into<ExampleValue>, description: impl Into<String>) -> RouteOption {
    RouteOption::Parameter(Parameter::body(BodySchema::Example(example.into()), description))
}

/// Required `body` parameter documented from any serializable example
pub fn with_json_schema<T: Serialize + ?Sized>(example: &T, description: impl Into<String>) -> RouteOption {
    with_request_body(ExampleValue::from_serialize(example), description)
}

/// Required `body` parameter with a schema declared by hand
pub fn with_body_schema(schema: Schema, description: impl Into<String>) -> RouteOption {
    RouteOption::Parameter(Parameter::body(BodySchema::Schema(schema), description))
}

/// Append-only, ordered collection of routes
#[derive(Default, Clone)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a route; options are applied in order
    pub fn add_route<O>(&mut self, method: HttpMethod, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        let mut route = Route::new(method, path, handler);
        for option in options {
            route.apply(option);
        }

        if self
            .routes
            .iter()
            .any(|r| r.method == route.method && r.path == route.path)
        {
            warn!(
                method = %route.method,
                path = %route.path,
                "Route declared twice, the later declaration wins in the API document"
            );
        }

        debug!(
            method = %route.method,
            path = %route.path,
            parameters = route.parameters.len(),
            "Route registered"
        );

        self.routes.push(route);
        &self.routes[self.routes.len() - 1]
    }

    pub fn get<O>(&mut self, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::GET, path, handler, options)
    }

    pub fn post<O>(&mut self, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::POST, path, handler, options)
    }

    pub fn put<O>(&mut self, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::PUT, path, handler, options)
    }

    pub fn delete<O>(&mut self, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::DELETE, path, handler, options)
    }

    pub fn patch<O>(&mut self, path: impl Into<String>, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::PATCH, path, handler, options)
    }

    /// Start a group whose routes share `prefix`
    pub fn group(&mut self, prefix: impl Into<String>) -> RouteGroup<'_> {
        RouteGroup::new(self, prefix)
    }

    /// Routes in declaration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| (r.method, r.path.as_str())))
            .finish()
    }
}
