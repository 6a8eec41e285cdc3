// Core library for the Keel framework
// Route declaration, schema synthesis, dependency resolution and the
// HTTP-facing types shared with the transport that serves the routes.

pub mod container;
pub mod error;
pub mod http;
pub mod logging;
pub mod responses;
pub mod route_group;
pub mod route_params;
pub mod route_registry;
pub mod schema;

pub use container::Container;
pub use error::*;
pub use http::*;
pub use route_group::RouteGroup;
pub use route_params::{BodySchema, Parameter, ParameterLocation, extract_path_parameters, to_openapi_path};
pub use route_registry::{Route, RouteOption, RouteRegistry};
pub use schema::{ExampleValue, Schema, synthesize};
