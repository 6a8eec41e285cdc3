//! Capturing examples from `Serialize` types
//!
//! Rust has no runtime reflection, so the shape of an example is recovered
//! by driving its `Serialize` impl into a serializer that records structure
//! instead of bytes. Struct fields arrive already renamed by serde, so each
//! captured field is tagged with its serialized name. Only fields dropped by
//! `skip_serializing_if` are tagged omit-when-empty; a present field is
//! required even when its type is an `Option`.

use super::example::{ExampleValue, FieldTag, Record, RecordField};
use crate::logging::warn;
use serde::Serialize;
use serde::ser::{self, Impossible};
use std::fmt;

impl ExampleValue {
    /// Capture the structure of any serializable value.
    ///
    /// Never fails: if the value's `Serialize` impl reports an error the
    /// result is [`ExampleValue::Unsupported`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match value.serialize(Capture) {
            Ok(captured) => captured,
            Err(e) => {
                warn!(
                    example_type = std::any::type_name::<T>(),
                    error = %e,
                    "Example could not be captured, documenting it as a plain value"
                );
                ExampleValue::Unsupported(e.0)
            }
        }
    }
}

#[derive(Debug)]
struct CaptureError(String);

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for CaptureError {}

impl ser::Error for CaptureError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CaptureError(msg.to_string())
    }
}

type Result<T> = std::result::Result<T, CaptureError>;

struct Capture;

impl ser::Serializer for Capture {
    type Ok = ExampleValue;
    type Error = CaptureError;
    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = SeqCapture;
    type SerializeMap = MapCapture;
    type SerializeStruct = RecordCapture;
    type SerializeStructVariant = RecordCapture;

    fn serialize_bool(self, v: bool) -> Result<ExampleValue> {
        Ok(ExampleValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_i128(self, v: i128) -> Result<ExampleValue> {
        Ok(i64::try_from(v)
            .map(ExampleValue::Int)
            .unwrap_or_else(|_| ExampleValue::Unsupported(v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<ExampleValue> {
        Ok(v.into())
    }

    fn serialize_u128(self, v: u128) -> Result<ExampleValue> {
        Ok(u64::try_from(v)
            .map(ExampleValue::Uint)
            .unwrap_or_else(|_| ExampleValue::Unsupported(v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> Result<ExampleValue> {
        Ok(ExampleValue::Float32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<ExampleValue> {
        Ok(ExampleValue::Float64(v))
    }

    fn serialize_char(self, v: char) -> Result<ExampleValue> {
        Ok(ExampleValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ExampleValue> {
        Ok(ExampleValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<ExampleValue> {
        Ok(ExampleValue::Seq(v.iter().map(|b| ExampleValue::Uint(u64::from(*b))).collect()))
    }

    fn serialize_none(self) -> Result<ExampleValue> {
        Ok(ExampleValue::Ref(None))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<ExampleValue> {
        Ok(ExampleValue::Ref(Some(Box::new(value.serialize(Capture)?))))
    }

    fn serialize_unit(self) -> Result<ExampleValue> {
        Ok(ExampleValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ExampleValue> {
        Ok(ExampleValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<ExampleValue> {
        Ok(ExampleValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<ExampleValue> {
        value.serialize(Capture)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<ExampleValue> {
        Ok(ExampleValue::Map(vec![(
            variant.to_string(),
            value.serialize(Capture)?,
        )]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture> {
        Ok(SeqCapture::new(None, len.unwrap_or_default()))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture> {
        Ok(SeqCapture::new(None, len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqCapture> {
        Ok(SeqCapture::new(None, len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqCapture> {
        Ok(SeqCapture::new(Some(variant), len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapCapture> {
        Ok(MapCapture {
            entries: Vec::with_capacity(len.unwrap_or_default()),
            pending_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<RecordCapture> {
        Ok(RecordCapture {
            record: Record::new(name),
            variant: None,
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<RecordCapture> {
        Ok(RecordCapture {
            record: Record::new(name),
            variant: Some(variant),
        })
    }
}

/// Wrap `value` as `{variant: value}`, the externally tagged enum layout
fn wrap_variant(variant: Option<&'static str>, value: ExampleValue) -> ExampleValue {
    match variant {
        Some(name) => ExampleValue::Map(vec![(name.to_string(), value)]),
        None => value,
    }
}

struct SeqCapture {
    items: Vec<ExampleValue>,
    variant: Option<&'static str>,
}

impl SeqCapture {
    fn new(variant: Option<&'static str>, len: usize) -> Self {
        Self {
            items: Vec::with_capacity(len),
            variant,
        }
    }

    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(Capture)?);
        Ok(())
    }

    fn finish(self) -> ExampleValue {
        wrap_variant(self.variant, ExampleValue::Seq(self.items))
    }
}

impl ser::SerializeSeq for SeqCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

struct MapCapture {
    entries: Vec<(String, ExampleValue)>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        self.pending_key = Some(key.serialize(KeyCapture)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CaptureError("map value without a key".to_string()))?;
        self.entries.push((key, value.serialize(Capture)?));
        Ok(())
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(ExampleValue::Map(self.entries))
    }
}

struct RecordCapture {
    record: Record,
    variant: Option<&'static str>,
}

impl RecordCapture {
    fn push<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        let value = value.serialize(Capture)?;
        self.record.fields.push(RecordField {
            name: key.to_string(),
            tag: Some(FieldTag::rename(key)),
            value,
            example: None,
        });
        Ok(())
    }

    fn skip(&mut self, key: &'static str) {
        self.record.fields.push(RecordField {
            name: key.to_string(),
            tag: Some(FieldTag {
                omit_empty: true,
                ..FieldTag::rename(key)
            }),
            value: ExampleValue::Null,
            example: None,
        });
    }

    fn finish(self) -> ExampleValue {
        wrap_variant(self.variant, ExampleValue::Record(self.record))
    }
}

impl ser::SerializeStruct for RecordCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.skip(key);
        Ok(())
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for RecordCapture {
    type Ok = ExampleValue;
    type Error = CaptureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<()> {
        self.push(key, value)
    }

    fn skip_field(&mut self, key: &'static str) -> Result<()> {
        self.skip(key);
        Ok(())
    }

    fn end(self) -> Result<ExampleValue> {
        Ok(self.finish())
    }
}

/// Serializer for map keys: scalars become their string form
struct KeyCapture;

impl KeyCapture {
    fn unsupported(kind: &str) -> CaptureError {
        CaptureError(format!("map keys of kind {} are not supported", kind))
    }
}

impl ser::Serializer for KeyCapture {
    type Ok = String;
    type Error = CaptureError;
    type SerializeSeq = Impossible<String, CaptureError>;
    type SerializeTuple = Impossible<String, CaptureError>;
    type SerializeTupleStruct = Impossible<String, CaptureError>;
    type SerializeTupleVariant = Impossible<String, CaptureError>;
    type SerializeMap = Impossible<String, CaptureError>;
    type SerializeStruct = Impossible<String, CaptureError>;
    type SerializeStructVariant = Impossible<String, CaptureError>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(Self::unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(Self::unsupported("none"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(Self::unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Ok(name.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(Self::unsupported("enum variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Self::unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Self::unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Self::unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Self::unsupported("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(Self::unsupported("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(Self::unsupported("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Self::unsupported("struct variant"))
    }
}
