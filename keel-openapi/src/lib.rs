//! Swagger 2.0 document generation for Keel
//!
//! Turns the routes of a [`keel_core::RouteRegistry`] into a Swagger 2.0
//! document and serves it as cached JSON or YAML.
//!
//! ## Quick Start
//!
//! ```
//! use keel_core::route_registry::{with_summary, with_tags};
//! use keel_core::{HttpResponse, RouteRegistry, handler};
//! use keel_openapi::{ApiDocs, ApiMetadata, DocumentAssembler};
//!
//! let mut registry = RouteRegistry::new();
//! registry.get(
//!     "/users/:id",
//!     handler(|_req| async { Ok(HttpResponse::ok()) }),
//!     [with_summary("Get user"), with_tags(["users"])],
//! );
//!
//! let metadata = ApiMetadata::new("User API", "1.0.0").host("localhost:8080");
//! let document = DocumentAssembler::new(metadata).assemble(registry.routes());
//!
//! let op = document.operation("/users/{id}", "get").unwrap();
//! assert_eq!(op.summary, "Get user");
//! assert_eq!(op.parameters[0].name, "id");
//!
//! let docs = ApiDocs::new(document);
//! assert!(docs.json().unwrap().contains("\"swagger\": \"2.0\""));
//! ```

pub mod assembler;
pub mod docs;
pub mod document;

pub use assembler::*;
pub use docs::ApiDocs;
pub use document::*;
