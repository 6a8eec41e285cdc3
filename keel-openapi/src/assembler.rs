//! Document assembly
//!
//! Walks the registered routes in order and builds the [`Document`]:
//!
//! - documentation scaffold routes are skipped
//! - `:name` path segments become `{name}`
//! - methods on the same path share one path entry; a later route for the
//!   same path and method replaces the earlier operation
//! - routes without explicit parameters get the extracted path parameters
//! - body examples are synthesized into schemas

use crate::document::{self, Contact, Document, Info, License, Operation, Response, ResponseSchema};
use keel_core::logging::{debug, info, warn};
use keel_core::route_params::{BodySchema, Parameter, ParameterLocation, extract_path_parameters, to_openapi_path};
use keel_core::schema::{Schema, synthesize};
use keel_core::Route;
use std::collections::BTreeMap;

/// Swagger version marker
pub const SWAGGER_VERSION: &str = "2.0";

/// Where the rendered document is served
pub const DOCUMENT_PATH: &str = "/openapi.json";

/// Documentation scaffold routes, never listed in the document
pub const DOCS_PATHS: &[&str] = &[
    "/",
    "/docs",
    "/redoc",
    "/swagger/*any",
    "/redoc/index.html",
    DOCUMENT_PATH,
    "/docs-static/*filepath",
];

pub const DEFAULT_SUMMARY: &str = "API endpoint";
pub const DEFAULT_DESCRIPTION: &str = "API endpoint description";
pub const DEFAULT_TAG: &str = "default";
pub const DEFAULT_RESPONSE: &str = "Successful response";

/// Whether `path` is one of the documentation scaffold routes
pub fn is_docs_path(path: &str) -> bool {
    DOCS_PATHS.contains(&path)
}

/// Top-level document metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiMetadata {
    pub title: String,
    pub description: String,
    pub version: String,
    pub host: String,
    pub base_path: String,
    pub schemes: Vec<String>,
    pub contact: Contact,
    pub license: License,
}

impl ApiMetadata {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            version: version.into(),
            host: String::new(),
            base_path: String::new(),
            schemes: Vec::new(),
            contact: Contact::default(),
            license: License::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into());
        self
    }

    pub fn contact(mut self, name: impl Into<String>, url: impl Into<String>, email: impl Into<String>) -> Self {
        self.contact = Contact {
            name: name.into(),
            url: url.into(),
            email: email.into(),
        };
        self
    }

    pub fn license(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.license = License {
            name: name.into(),
            url: url.into(),
        };
        self
    }
}

/// Builds documents from route lists
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    metadata: ApiMetadata,
}

impl DocumentAssembler {
    pub fn new(metadata: ApiMetadata) -> Self {
        Self { metadata }
    }

    pub fn metadata(&self) -> &ApiMetadata {
        &self.metadata
    }

    pub fn assemble(&self, routes: &[Route]) -> Document {
        let meta = &self.metadata;
        let mut document = Document {
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                title: meta.title.clone(),
                description: meta.description.clone(),
                version: meta.version.clone(),
                contact: meta.contact.clone(),
                license: meta.license.clone(),
            },
            host: meta.host.clone(),
            base_path: meta.base_path.clone(),
            schemes: meta.schemes.clone(),
            paths: Default::default(),
        };

        for route in routes {
            if is_docs_path(&route.path) {
                debug!(path = %route.path, "Skipping documentation route");
                continue;
            }

            let path = to_openapi_path(&route.path);
            let method = route.method.as_lower().to_string();
            let replaced = document
                .paths
                .entry(path.clone())
                .or_default()
                .insert(method, build_operation(route))
                .is_some();

            if replaced {
                warn!(
                    method = %route.method,
                    path = %path,
                    "Operation replaced by a later route"
                );
            }
        }

        info!(
            paths = document.paths.len(),
            routes = routes.len(),
            "API document assembled"
        );
        document
    }
}

fn build_operation(route: &Route) -> Operation {
    let parameters = if route.parameters.is_empty() {
        extract_path_parameters(&route.path)
    } else {
        route.parameters.clone()
    };

    Operation {
        summary: non_empty_or(&route.summary, DEFAULT_SUMMARY),
        description: non_empty_or(&route.description, DEFAULT_DESCRIPTION),
        tags: if route.tags.is_empty() {
            vec![DEFAULT_TAG.to_string()]
        } else {
            route.tags.clone()
        },
        parameters: parameters.iter().map(document_parameter).collect(),
        responses: build_responses(route),
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// The default 200 response plus every status the route declares
fn build_responses(route: &Route) -> BTreeMap<String, Response> {
    let mut responses = BTreeMap::new();
    responses.insert(
        "200".to_string(),
        Response {
            description: DEFAULT_RESPONSE.to_string(),
            schema: Some(ResponseSchema::object()),
        },
    );

    for (status, description) in &route.responses {
        let schema = (*status == 200).then(ResponseSchema::object);
        responses.insert(
            status.to_string(),
            Response {
                description: description.clone(),
                schema,
            },
        );
    }
    responses
}

fn document_parameter(param: &Parameter) -> document::Parameter {
    let mut doc = document::Parameter {
        name: param.name.clone(),
        location: param.location.as_str().to_string(),
        required: param.required,
        description: param.description.clone(),
        param_type: None,
        format: None,
        schema: None,
    };

    if param.location == ParameterLocation::Body {
        doc.schema = Some(match &param.body {
            Some(BodySchema::Example(example)) => synthesize(example),
            Some(BodySchema::Schema(schema)) => schema.clone(),
            None => Schema::object(),
        });
    } else {
        doc.param_type = Some(param.param_type.clone());
        doc.format = param.format.clone().filter(|f| !f.is_empty());
    }
    doc
}
