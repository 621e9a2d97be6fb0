//! [`Value`]: a fully materialized document.

use std::marker::PhantomData;
use std::slice;

use docstream_base64::to_base64;

use crate::document::{ArrayStream, ByteStream, Document, MapStream, Nodes};
use crate::error::{Error, Result};
use crate::transcode::copy_document;
use crate::writer::{DocumentWriter, Writable};

/// Owned document tree, with the same variants as [`Document`].
///
/// Map entries keep their order and may have keys of any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Double(f64),
    Text(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Reads `document` to its end into an owned value.
    pub fn read<N: Nodes>(document: Document<N>) -> Result<Value> {
        Ok(match document {
            Document::Null => Value::Null,
            Document::Undefined => Value::Undefined,
            Document::Bool(value) => Value::Bool(value),
            Document::Unsigned(value) => Value::Unsigned(value),
            Document::Signed(value) => Value::Signed(value),
            Document::Double(value) => Value::Double(value),
            Document::Text(mut text) => Value::Text(text.read_to_string()?),
            Document::Binary(mut binary) => Value::Binary(binary.read_to_vec()?),
            Document::Array(mut array) => {
                let mut items = Vec::new();
                while let Some(item) = array.next()? {
                    items.push(Value::read(item)?);
                }
                Value::Array(items)
            }
            Document::Map(mut map) => {
                let mut entries = Vec::new();
                loop {
                    let Some(key) = map.next_key()? else {
                        break;
                    };
                    let key = Value::read(key)?;
                    let value = Value::read(map.read_value()?)?;
                    entries.push((key, value));
                }
                Value::Map(entries)
            }
        })
    }

    /// Borrows this value as a document, so it can be handed to any writer.
    pub fn document(&self) -> Document<ValueNodes<'_>> {
        match self {
            Value::Null => Document::Null,
            Value::Undefined => Document::Undefined,
            Value::Bool(value) => Document::Bool(*value),
            Value::Unsigned(value) => Document::Unsigned(*value),
            Value::Signed(value) => Document::Signed(*value),
            Value::Double(value) => Document::Double(*value),
            Value::Text(text) => Document::Text(ValueBytes::new(text.as_bytes())),
            Value::Binary(bytes) => Document::Binary(ValueBytes::new(bytes)),
            Value::Array(items) => Document::Array(ValueArray {
                items: items.iter(),
                size: items.len() as u64,
            }),
            Value::Map(entries) => Document::Map(ValueMap {
                entries: entries.iter(),
                value: None,
                size: entries.len() as u64,
            }),
        }
    }
}

impl Writable for &Value {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        copy_document(writer, self.document())
    }
}

/// Node types of a borrowed [`Value`].
pub struct ValueNodes<'v>(PhantomData<&'v Value>);

impl<'v> Nodes for ValueNodes<'v> {
    type Text = ValueBytes<'v>;
    type Binary = ValueBytes<'v>;
    type Array = ValueArray<'v>;
    type Map = ValueMap<'v>;
}

pub struct ValueBytes<'v> {
    bytes: &'v [u8],
    pos: usize,
}

impl<'v> ValueBytes<'v> {
    fn new(bytes: &'v [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl ByteStream for ValueBytes<'_> {
    fn size(&self) -> Option<u64> {
        Some(self.bytes.len() as u64)
    }

    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize> {
        let rest = &self.bytes[self.pos..];
        let n = rest.len().min(buf.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }
}

pub struct ValueArray<'v> {
    items: slice::Iter<'v, Value>,
    size: u64,
}

impl<'v> ArrayStream for ValueArray<'v> {
    type Nodes<'a>
        = ValueNodes<'a>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }

    fn next(&mut self) -> Result<Option<Document<ValueNodes<'_>>>> {
        Ok(self.items.next().map(Value::document))
    }
}

pub struct ValueMap<'v> {
    entries: slice::Iter<'v, (Value, Value)>,
    value: Option<&'v Value>,
    size: u64,
}

impl<'v> MapStream for ValueMap<'v> {
    type Nodes<'a>
        = ValueNodes<'a>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        Some(self.size)
    }

    fn next_key(&mut self) -> Result<Option<Document<ValueNodes<'_>>>> {
        Ok(self.entries.next().map(|(key, value)| {
            self.value = Some(value);
            key.document()
        }))
    }

    fn read_value(&mut self) -> Result<Document<ValueNodes<'_>>> {
        self.value
            .take()
            .map(Value::document)
            .ok_or(Error::Malformed("map value requested without a key"))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Unsigned(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        if value >= 0 {
            Value::Unsigned(value as u64)
        } else {
            Value::Signed(value)
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Binary(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::Unsigned(u)
                } else if let Some(i) = n.as_i64() {
                    Value::Signed(i)
                } else {
                    Value::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Lossy: binary becomes base64 text, undefined and non-finite doubles
/// become null, and non-text map keys are rendered as JSON text.
impl From<Value> for serde_json::Value {
    fn from(v: Value) -> Self {
        match v {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Unsigned(u) => serde_json::Value::from(u),
            Value::Signed(i) => serde_json::Value::from(i),
            Value::Double(f) => serde_json::Number::from_f64(f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Binary(b) => serde_json::Value::String(to_base64(&b)),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (key_string(k), serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

fn key_string(key: Value) -> String {
    match serde_json::Value::from(key) {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cbor, json};
    use docstream_buffers::Reader;
    use serde_json::json;

    #[test]
    fn test_from_serde_json() {
        let value = Value::from(json!({"a": [1, -2, 2.5, null], "b": "x"}));
        assert_eq!(
            value,
            Value::Map(vec![
                (
                    Value::from("a"),
                    Value::Array(vec![
                        Value::Unsigned(1),
                        Value::Signed(-2),
                        Value::Double(2.5),
                        Value::Null,
                    ])
                ),
                (Value::from("b"), Value::from("x")),
            ])
        );
    }

    #[test]
    fn test_into_serde_json() {
        let value = Value::Map(vec![
            (Value::Unsigned(1), Value::Binary(b"hi".to_vec())),
            (Value::from("u"), Value::Undefined),
            (Value::from("nan"), Value::Double(f64::NAN)),
        ]);
        assert_eq!(
            serde_json::Value::from(value),
            json!({"1": "aGk=", "u": null, "nan": null})
        );
    }

    #[test]
    fn test_value_as_document_source() {
        let value = Value::Map(vec![
            (Value::from("A"), Value::Unsigned(1)),
            (Value::from("B"), Value::from("text")),
            (Value::from("C"), Value::Binary(b"Hello world!".to_vec())),
        ]);
        let mut out: Vec<u8> = Vec::new();
        json::write(&mut out).write(&value).unwrap();
        assert_eq!(out, br#"{"A":1,"B":"text","C":"SGVsbG8gd29ybGQh"}"#);

        let mut encoded: Vec<u8> = Vec::new();
        cbor::write(&mut encoded).write(&value).unwrap();
        assert_eq!(encoded[0], 0xa3);
        let mut reader = Reader::new(&encoded);
        assert_eq!(Value::read(cbor::read(&mut reader).unwrap()).unwrap(), value);
    }

    #[test]
    fn test_value_map_read_value_without_key() {
        let value = Value::Map(vec![]);
        let Document::Map(mut map) = value.document() else {
            panic!("expected a map");
        };
        assert!(map.next_key().unwrap().is_none());
        assert!(matches!(map.read_value(), Err(Error::Malformed(_))));
    }
}
