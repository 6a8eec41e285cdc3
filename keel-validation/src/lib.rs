//! Validation for Keel handlers
//!
//! Formats constraint failures into readable, structured errors, parses
//! declared query parameters and binds request bodies with the
//! [`validator`] crate.
//!
//! # Examples
//!
//! ## Formatting failures
//!
//! ```
//! use keel_validation::{FieldFailure, format_validation_errors};
//!
//! let errors = format_validation_errors(&[
//!     FieldFailure::new("email", "required"),
//!     FieldFailure::new("age", "gte").with_param("18").with_value("12"),
//! ]);
//!
//! assert_eq!(
//!     errors.to_string(),
//!     "field 'email' is required; field 'age' must be greater than or equal to 18"
//! );
//! assert_eq!(errors.to_response().status, 400);
//! ```
//!
//! ## Query parameters
//!
//! ```
//! use keel_validation::{QueryParam, QueryValue, parse_query_params, parse_query_string};
//!
//! let values = parse_query_string("page=2&active=true").unwrap();
//! let params = [
//!     QueryParam::new("page", "int").required(),
//!     QueryParam::new("active", "bool"),
//!     QueryParam::new("per_page", "int").with_default(20i64),
//! ];
//!
//! let parsed = parse_query_params(&values, &params).unwrap();
//! assert_eq!(parsed["page"], QueryValue::Int(2));
//! assert_eq!(parsed["active"], QueryValue::Bool(true));
//! assert_eq!(parsed["per_page"], QueryValue::Int(20));
//! ```

mod bind;
mod engine;
mod errors;
mod formatter;
mod query;

pub use bind::*;
pub use engine::*;
pub use errors::*;
pub use formatter::*;
pub use query::*;

pub use validator::Validate;
