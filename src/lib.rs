// Keel - a declarative API layer for Rust
//
// Routes are declared with their documentation, the Swagger 2.0 document is
// generated from them, dependencies are resolved per request by type, and
// validation failures come back as structured errors. Serving requests is
// left to the transport of your choice.

mod app;

pub use app::{App, metadata_from};

// Re-export core functionality
pub use keel_core::*;

pub use keel_config;
pub use keel_openapi;

#[cfg(feature = "validation")]
pub use keel_validation;

/// Everything needed to declare an API
pub mod prelude {
    pub use crate::App;
    pub use keel_config::{ApiConfig, ConfigBuilder, Contact, License};
    pub use keel_core::responses::{
        ApiResponse, ErrorResponse, PaginatedResponse, ResponseBuilder, created, paginated, success,
    };
    pub use keel_core::route_registry::{
        with_body_schema, with_description, with_json_schema, with_parameter, with_path_parameter,
        with_query_parameter, with_request_body, with_response, with_summary, with_tags,
    };
    pub use keel_core::schema::{FieldSchema, Record, RecordField};
    pub use keel_core::{
        Container, Error, ExampleValue, HandlerFn, HttpMethod, HttpResponse, Parameter, ParameterLocation,
        ProviderError, RequestContext, Route, RouteGroup, RouteOption, Schema, handler,
    };
    pub use keel_openapi::{ApiDocs, DOCUMENT_PATH, Document};

    #[cfg(feature = "validation")]
    pub use keel_validation::{
        BindError, QueryParam, QueryValue, ValidationError, ValidationErrors, bind_and_validate, bind_request,
        parse_query_params, parse_request_query,
    };
}
