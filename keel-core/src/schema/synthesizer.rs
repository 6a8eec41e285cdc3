use super::{ExampleValue, FieldSchema, RecordField, Schema};
use crate::logging::{debug, trace};

/// Derive an object schema from an example value.
///
/// - No example, or a null reference: empty object schema, no example.
/// - References are followed to their target first.
/// - Records produce one property per field, in declaration order; the
///   `required` list keeps that order.
/// - Any other value is attached as the example with no properties.
pub fn synthesize(example: &ExampleValue) -> Schema {
    let mut schema = Schema::object();

    let value = match example {
        ExampleValue::Null => return schema,
        other => match other.resolved() {
            Some(value) => value,
            None => return schema,
        },
    };

    schema.example = Some(value.to_json());

    if let ExampleValue::Record(record) = value {
        for field in &record.fields {
            let name = field.wire_name().to_string();
            if field.is_required() {
                schema.required.push(name.clone());
            }
            schema.properties.insert(name, field_schema(field));
        }
        debug!(
            record = %record.type_name,
            properties = schema.properties.len(),
            required = schema.required.len(),
            "Synthesized body schema"
        );
    } else {
        trace!("Example is not a record, documenting example only");
    }

    schema
}

fn field_schema(field: &RecordField) -> FieldSchema {
    let mut schema = value_schema(&field.value);
    if let Some(example) = &field.example {
        schema.example = Some(example.clone());
    }
    schema
}

fn value_schema(value: &ExampleValue) -> FieldSchema {
    match value {
        ExampleValue::String(_) => FieldSchema::string(),
        ExampleValue::Int(_) | ExampleValue::Uint(_) => FieldSchema::integer(),
        ExampleValue::Float32(_) => FieldSchema::float(),
        ExampleValue::Float64(_) => FieldSchema::double(),
        ExampleValue::Bool(_) => FieldSchema::boolean(),
        ExampleValue::Seq(_) => FieldSchema::array(),
        ExampleValue::Ref(Some(inner)) => value_schema(inner),
        ExampleValue::Ref(None)
        | ExampleValue::Null
        | ExampleValue::Map(_)
        | ExampleValue::Record(_)
        | ExampleValue::Unsupported(_) => FieldSchema::string(),
    }
}
