//! Swagger 2.0 document types
//!
//! Only the subset Keel emits: path, query, header and body parameters and
//! per-status response descriptions. Maps are ordered so that rendering is
//! deterministic.

use keel_core::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operations of one path, keyed by lowercase method
pub type PathItem = BTreeMap<String, Operation>;

/// The API description document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub swagger: String,
    pub info: Info,
    pub host: String,
    #[serde(rename = "basePath")]
    pub base_path: String,
    pub schemes: Vec<String>,
    pub paths: BTreeMap<String, PathItem>,
}

impl Document {
    /// Look up the operation for a document path and lowercase method
    pub fn operation(&self, path: &str, method: &str) -> Option<&Operation> {
        self.paths.get(path).and_then(|item| item.get(method))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
    pub contact: Contact,
    pub license: License,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub url: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub url: String,
}

/// One method on one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub parameters: Vec<Parameter>,
    /// Keyed by status code, as a string
    pub responses: BTreeMap<String, Response>,
}

/// Document form of a parameter.
///
/// Body parameters carry `schema`; all others carry `type` and, when
/// known, `format`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResponseSchema>,
}

/// Response payload shape; Keel only documents its type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
}

impl ResponseSchema {
    /// Permissive `{"type": "object"}`
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
        }
    }
}
