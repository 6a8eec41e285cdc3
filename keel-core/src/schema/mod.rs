//! Schema synthesis
//!
//! Turns example values into the structural [`Schema`] used to document
//! request bodies. Synthesis is best-effort: it never fails, and shapes it
//! cannot describe are documented as `string`.
//!
//! # Examples
//!
//! ```
//! use keel_core::schema::{synthesize, ExampleValue, Record, RecordField};
//!
//! let example: ExampleValue = Record::new("CreateUser")
//!     .field(RecordField::new("Name", "Ada").tagged("name"))
//!     .field(RecordField::new("Bio", "").tagged("bio,omitempty"))
//!     .into();
//!
//! let schema = synthesize(&example);
//! assert_eq!(schema.required, vec!["name"]);
//! assert_eq!(schema.properties["bio"].field_type, "string");
//! ```

mod capture;
mod example;
mod synthesizer;

pub use example::{ExampleValue, FieldTag, Record, RecordField};
pub use synthesizer::synthesize;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Structural description of a body payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, FieldSchema>,
    /// Required field names, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// An object schema with no properties
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            example: None,
        }
    }

    /// Add a property; for schemas declared by hand instead of synthesized
    pub fn property(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Add a property and list it as required
    pub fn required_property(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.properties.insert(name, schema);
        self
    }

    pub fn with_example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::object()
    }
}

/// Schema of a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSchema>>,
}

impl FieldSchema {
    fn primitive(field_type: &str, format: Option<&str>) -> Self {
        Self {
            field_type: field_type.to_string(),
            format: format.map(str::to_string),
            example: None,
            items: None,
        }
    }

    pub fn string() -> Self {
        Self::primitive("string", None)
    }

    /// `integer` / `int64`
    pub fn integer() -> Self {
        Self::primitive("integer", Some("int64"))
    }

    /// `number` / `float`
    pub fn float() -> Self {
        Self::primitive("number", Some("float"))
    }

    /// `number` / `double`
    pub fn double() -> Self {
        Self::primitive("number", Some("double"))
    }

    pub fn boolean() -> Self {
        Self::primitive("boolean", None)
    }

    /// `array` whose items are documented as `string`
    pub fn array() -> Self {
        Self {
            items: Some(Box::new(Self::string())),
            ..Self::primitive("array", None)
        }
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_serialization_shape() {
        let schema = Schema::object()
            .required_property("id", FieldSchema::integer())
            .property("tags", FieldSchema::array());

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": {"type": "integer", "format": "int64"},
                    "tags": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn test_empty_object_keeps_properties_key() {
        assert_eq!(
            serde_json::to_value(Schema::object()).unwrap(),
            json!({"type": "object", "properties": {}})
        );
    }
}
