//! Serving the assembled document
//!
//! The document is rendered once and the same string is returned for every
//! request afterwards.

use crate::document::Document;
use keel_core::logging::debug;
use keel_core::{Error, HttpResponse};
use once_cell::sync::OnceCell;

/// An assembled document with its cached renderings
#[derive(Debug)]
pub struct ApiDocs {
    document: Document,
    json: OnceCell<String>,
    yaml: OnceCell<String>,
}

impl ApiDocs {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            json: OnceCell::new(),
            yaml: OnceCell::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Pretty-printed JSON, rendered on first use
    pub fn json(&self) -> Result<&str, Error> {
        self.json
            .get_or_try_init(|| {
                debug!("Rendering API document as JSON");
                serde_json::to_string_pretty(&self.document)
                    .map_err(|e| Error::Internal(format!("Failed to serialize document: {}", e)))
            })
            .map(String::as_str)
    }

    /// YAML rendering, rendered on first use
    pub fn yaml(&self) -> Result<&str, Error> {
        self.yaml
            .get_or_try_init(|| {
                debug!("Rendering API document as YAML");
                serde_yaml::to_string(&self.document)
                    .map_err(|e| Error::Internal(format!("Failed to serialize document: {}", e)))
            })
            .map(String::as_str)
    }

    /// `200 application/json` response carrying the cached document
    pub fn json_response(&self) -> Result<HttpResponse, Error> {
        Ok(HttpResponse::ok()
            .with_header("Content-Type", "application/json")
            .with_body(self.json()?.as_bytes()))
    }

    /// `200 application/yaml` response carrying the cached document
    pub fn yaml_response(&self) -> Result<HttpResponse, Error> {
        Ok(HttpResponse::ok()
            .with_header("Content-Type", "application/yaml")
            .with_body(self.yaml()?.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::{ApiMetadata, DocumentAssembler};

    fn docs() -> ApiDocs {
        let document = DocumentAssembler::new(ApiMetadata::new("Docs", "1.0.0")).assemble(&[]);
        ApiDocs::new(document)
    }

    #[test]
    fn test_json_is_rendered_once() {
        let docs = docs();
        let first = docs.json().unwrap();
        let second = docs.json().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_json_response() {
        let docs = docs();
        let resp = docs.json_response().unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.headers["Content-Type"], "application/json");
        assert_eq!(resp.body, docs.json().unwrap().as_bytes());
    }

    #[test]
    fn test_yaml_rendering() {
        let docs = docs();
        let yaml = docs.yaml().unwrap();
        assert!(yaml.contains("swagger: '2.0'") || yaml.contains("swagger: \"2.0\""));
        assert!(yaml.contains("title: Docs"));
        assert_eq!(docs.yaml_response().unwrap().headers["Content-Type"], "application/yaml");
    }
}
