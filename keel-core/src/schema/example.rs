//! Example values
//!
//! An [`ExampleValue`] is a structural snapshot of a payload: its kind, its
//! fields (for records) and the serialization tag metadata of each field.
//! Examples are either built by hand with [`Record`] and [`RecordField`] or
//! captured from any `Serialize` type with [`ExampleValue::from_serialize`].

use serde_json::{Map, Number, Value};

/// A runtime value used as a documentation example
#[derive(Debug, Clone, PartialEq)]
pub enum ExampleValue {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    String(String),
    Seq(Vec<ExampleValue>),
    /// String-keyed map, in insertion order
    Map(Vec<(String, ExampleValue)>),
    /// Optional / reference value; `None` is a null reference
    Ref(Option<Box<ExampleValue>>),
    Record(Record),
    /// A value whose shape could not be captured; carries a description
    Unsupported(String),
}

/// A struct-like value: named fields in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub type_name: String,
    pub fields: Vec<RecordField>,
}

/// One field of a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    /// Name as declared on the type
    pub name: String,
    /// Serialization tag, if the field carries one
    pub tag: Option<FieldTag>,
    pub value: ExampleValue,
    /// Example text shown for this field in documents
    pub example: Option<String>,
}

/// Serialization tag attached to a record field
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldTag {
    /// Serialized name; `None` keeps the declared name
    pub rename: Option<String>,
    /// Field is left out of the payload when empty
    pub omit_empty: bool,
    /// Field is never serialized
    pub suppressed: bool,
}

impl FieldTag {
    /// Parse a tag in `name,option,...` form.
    ///
    /// `"-"` suppresses the field and `omitempty` marks it optional. An empty
    /// tag is the same as no tag at all.
    pub fn parse(tag: &str) -> Option<Self> {
        if tag.is_empty() {
            return None;
        }
        if tag == "-" {
            return Some(Self {
                suppressed: true,
                ..Self::default()
            });
        }

        let mut parts = tag.split(',');
        let name = parts.next().unwrap_or_default();
        Some(Self {
            rename: (!name.is_empty()).then(|| name.to_string()),
            omit_empty: parts.any(|opt| opt == "omitempty"),
            suppressed: false,
        })
    }

    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            rename: Some(name.into()),
            ..Self::default()
        }
    }
}

impl RecordField {
    /// An untagged field
    pub fn new(name: impl Into<String>, value: impl Into<ExampleValue>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            value: value.into(),
            example: None,
        }
    }

    /// Attach a tag in `name,option,...` form (see [`FieldTag::parse`])
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag = FieldTag::parse(tag);
        self
    }

    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.tag.get_or_insert_with(FieldTag::default).rename = Some(name.into());
        self
    }

    pub fn omit_empty(mut self) -> Self {
        self.tag.get_or_insert_with(FieldTag::default).omit_empty = true;
        self
    }

    pub fn suppressed(mut self) -> Self {
        self.tag.get_or_insert_with(FieldTag::default).suppressed = true;
        self
    }

    pub fn example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Name this field is documented under
    pub fn wire_name(&self) -> &str {
        match &self.tag {
            Some(FieldTag {
                rename: Some(name),
                suppressed: false,
                ..
            }) => name,
            _ => &self.name,
        }
    }

    /// Whether the field is listed as required.
    ///
    /// Untagged and suppressed fields are required; tagged fields are
    /// required unless marked omit-when-empty.
    pub fn is_required(&self) -> bool {
        match &self.tag {
            None => true,
            Some(tag) => tag.suppressed || !tag.omit_empty,
        }
    }
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut RecordField> {
        self.fields
            .iter_mut()
            .find(|f| f.name == name || f.wire_name() == name)
    }
}

impl ExampleValue {
    /// Follow references down to the first non-reference value.
    ///
    /// Returns `None` for a null reference.
    pub fn resolved(&self) -> Option<&ExampleValue> {
        match self {
            ExampleValue::Ref(Some(inner)) => inner.as_ref().resolved(),
            ExampleValue::Ref(None) => None,
            other => Some(other),
        }
    }

    /// Mark a record field as omit-when-empty.
    ///
    /// Useful for captured values whose `skip_serializing_if` field happened
    /// to be present. No-op when the value is not a record or has no such
    /// field.
    pub fn with_optional(mut self, field: &str) -> Self {
        if let Some(f) = self.record_mut().and_then(|r| r.field_mut(field)) {
            f.tag.get_or_insert_with(FieldTag::default).omit_empty = true;
        }
        self
    }

    /// Attach example text to a record field
    pub fn with_field_example(mut self, field: &str, example: impl Into<String>) -> Self {
        if let Some(f) = self.record_mut().and_then(|r| r.field_mut(field)) {
            f.example = Some(example.into());
        }
        self
    }

    fn record_mut(&mut self) -> Option<&mut Record> {
        match self {
            ExampleValue::Record(record) => Some(record),
            ExampleValue::Ref(Some(inner)) => inner.record_mut(),
            _ => None,
        }
    }

    /// Whether an omit-when-empty field holding this value is left out
    pub fn is_empty_value(&self) -> bool {
        match self {
            ExampleValue::Null | ExampleValue::Ref(None) => true,
            ExampleValue::Bool(b) => !b,
            ExampleValue::Int(n) => *n == 0,
            ExampleValue::Uint(n) => *n == 0,
            ExampleValue::Float32(n) => *n == 0.0,
            ExampleValue::Float64(n) => *n == 0.0,
            ExampleValue::String(s) => s.is_empty(),
            ExampleValue::Seq(items) => items.is_empty(),
            ExampleValue::Map(entries) => entries.is_empty(),
            ExampleValue::Ref(Some(_)) | ExampleValue::Record(_) | ExampleValue::Unsupported(_) => {
                false
            }
        }
    }

    /// JSON form of the value, as it would appear on the wire
    pub fn to_json(&self) -> Value {
        match self {
            ExampleValue::Null | ExampleValue::Ref(None) | ExampleValue::Unsupported(_) => {
                Value::Null
            }
            ExampleValue::Bool(b) => Value::Bool(*b),
            ExampleValue::Int(n) => Value::from(*n),
            ExampleValue::Uint(n) => Value::from(*n),
            ExampleValue::Float32(n) => float_json(f64::from(*n)),
            ExampleValue::Float64(n) => float_json(*n),
            ExampleValue::String(s) => Value::String(s.clone()),
            ExampleValue::Seq(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            ExampleValue::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            ExampleValue::Ref(Some(inner)) => inner.to_json(),
            ExampleValue::Record(record) => {
                let mut object = Map::new();
                for field in &record.fields {
                    let omitted = match &field.tag {
                        Some(tag) if tag.suppressed => true,
                        Some(tag) if tag.omit_empty => field.value.is_empty_value(),
                        _ => false,
                    };
                    if !omitted {
                        object.insert(field.wire_name().to_string(), field.value.to_json());
                    }
                }
                Value::Object(object)
            }
        }
    }
}

fn float_json(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

macro_rules! from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for ExampleValue {
            fn from(n: $t) -> Self {
                ExampleValue::Int(n as i64)
            }
        }
    )*};
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for ExampleValue {
            fn from(n: $t) -> Self {
                ExampleValue::Uint(n as u64)
            }
        }
    )*};
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for ExampleValue {
    fn from(b: bool) -> Self {
        ExampleValue::Bool(b)
    }
}

impl From<f32> for ExampleValue {
    fn from(n: f32) -> Self {
        ExampleValue::Float32(n)
    }
}

impl From<f64> for ExampleValue {
    fn from(n: f64) -> Self {
        ExampleValue::Float64(n)
    }
}

impl From<&str> for ExampleValue {
    fn from(s: &str) -> Self {
        ExampleValue::String(s.to_string())
    }
}

impl From<String> for ExampleValue {
    fn from(s: String) -> Self {
        ExampleValue::String(s)
    }
}

impl<T: Into<ExampleValue>> From<Vec<T>> for ExampleValue {
    fn from(items: Vec<T>) -> Self {
        ExampleValue::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ExampleValue>> From<Option<T>> for ExampleValue {
    fn from(value: Option<T>) -> Self {
        ExampleValue::Ref(value.map(|v| Box::new(v.into())))
    }
}

impl From<Record> for ExampleValue {
    fn from(record: Record) -> Self {
        ExampleValue::Record(record)
    }
}

impl From<Value> for ExampleValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ExampleValue::Null,
            Value::Bool(b) => ExampleValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    ExampleValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    ExampleValue::Uint(u)
                } else {
                    ExampleValue::Float64(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => ExampleValue::String(s),
            Value::Array(items) => ExampleValue::Seq(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => {
                ExampleValue::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
