//! Streaming JSON writer producing compact output.

use docstream_base64::Base64Encoder;
use docstream_buffers::WriteStream;

use crate::error::{Error, Result};
use crate::writer::{ArrayWriter, DocumentWriter, MapWriter, StreamWriter};

/// Writes one JSON value.
///
/// Separators are owned by the parent container: a writer handed out by
/// [`JsonArrayWriter::append`] or [`JsonMapWriter`] carries the `,` or `:`
/// it must emit before its value. In key position scalars are quoted, so
/// `1` becomes the key `"1"`; containers cannot be keys.
///
/// JSON has no binary or undefined: binary payloads are written as base64
/// strings and undefined as `null`. Non-finite doubles are written as `null`.
pub struct JsonWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    separator: Option<u8>,
    key: bool,
}

impl<'s, S: WriteStream + ?Sized> JsonWriter<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            separator: None,
            key: false,
        }
    }

    fn begin(&mut self) -> Result<()> {
        if let Some(separator) = self.separator.take() {
            self.stream.write_u8(separator)?;
        }
        Ok(())
    }

    fn write_literal(mut self, literal: &[u8]) -> Result<()> {
        self.begin()?;
        if self.key {
            self.stream.write_u8(b'"')?;
            self.stream.write_buffer(literal)?;
            self.stream.write_u8(b'"')?;
        } else {
            self.stream.write_buffer(literal)?;
        }
        Ok(())
    }

    fn open(mut self, delimiter: u8) -> Result<&'s mut S> {
        self.begin()?;
        self.stream.write_u8(delimiter)?;
        Ok(self.stream)
    }
}

impl<'s, S: WriteStream + ?Sized> DocumentWriter for JsonWriter<'s, S> {
    type Text = JsonTextWriter<'s, S>;
    type Binary = JsonBase64Writer<'s, S>;
    type Array = JsonArrayWriter<'s, S>;
    type Map = JsonMapWriter<'s, S>;

    fn write_null(self) -> Result<()> {
        self.write_literal(b"null")
    }

    fn write_undefined(self) -> Result<()> {
        self.write_literal(b"null")
    }

    fn write_bool(self, value: bool) -> Result<()> {
        let literal: &[u8] = if value { b"true" } else { b"false" };
        self.write_literal(literal)
    }

    fn write_u64(self, value: u64) -> Result<()> {
        self.write_literal(value.to_string().as_bytes())
    }

    fn write_i64(self, value: i64) -> Result<()> {
        self.write_literal(value.to_string().as_bytes())
    }

    fn write_f64(self, value: f64) -> Result<()> {
        self.write_literal(format_double(value).as_bytes())
    }

    fn write_text(self, _size: Option<u64>) -> Result<Self::Text> {
        Ok(JsonTextWriter {
            stream: self.open(b'"')?,
        })
    }

    fn write_binary(self, _size: Option<u64>) -> Result<Self::Binary> {
        Ok(JsonBase64Writer {
            stream: self.open(b'"')?,
            encoder: Base64Encoder::new(),
            scratch: Vec::new(),
        })
    }

    fn write_array(self, _size: Option<u64>) -> Result<Self::Array> {
        if self.key {
            return Err(Error::Unsupported("array as an object key"));
        }
        Ok(JsonArrayWriter {
            stream: self.open(b'[')?,
            first: true,
        })
    }

    fn write_map(self, _size: Option<u64>) -> Result<Self::Map> {
        if self.key {
            return Err(Error::Unsupported("object as an object key"));
        }
        Ok(JsonMapWriter {
            stream: self.open(b'{')?,
            first: true,
        })
    }
}

fn format_double(value: f64) -> String {
    if !value.is_finite() {
        return "null".to_string();
    }
    let mut out = value.to_string();
    if !out.contains('.') {
        out.push_str(".0");
    }
    out
}

/// Writes `bytes` as the inside of a JSON string literal.
fn write_escaped<S: WriteStream + ?Sized>(stream: &mut S, bytes: &[u8]) -> Result<()> {
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        let escape: &[u8] = match b {
            b'"' => b"\\\"",
            b'\\' => b"\\\\",
            b'\n' => b"\\n",
            b'\r' => b"\\r",
            b'\t' => b"\\t",
            0x08 => b"\\b",
            0x0c => b"\\f",
            0x00..=0x1f => &[],
            _ => continue,
        };
        stream.write_buffer(&bytes[start..i])?;
        if escape.is_empty() {
            const HEX: &[u8; 16] = b"0123456789abcdef";
            stream.write_buffer(&[
                b'\\',
                b'u',
                b'0',
                b'0',
                HEX[(b >> 4) as usize],
                HEX[(b & 0xf) as usize],
            ])?;
        } else {
            stream.write_buffer(escape)?;
        }
        start = i + 1;
    }
    stream.write_buffer(&bytes[start..])?;
    Ok(())
}

pub struct JsonTextWriter<'s, S: ?Sized> {
    stream: &'s mut S,
}

impl<S: WriteStream + ?Sized> StreamWriter for JsonTextWriter<'_, S> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        write_escaped(&mut *self.stream, bytes)
    }

    fn flush(self) -> Result<()> {
        self.stream.write_u8(b'"')?;
        Ok(())
    }
}

/// Binary payload, written as a base64 string.
pub struct JsonBase64Writer<'s, S: ?Sized> {
    stream: &'s mut S,
    encoder: Base64Encoder,
    scratch: Vec<u8>,
}

impl<S: WriteStream + ?Sized> StreamWriter for JsonBase64Writer<'_, S> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        self.scratch.clear();
        self.encoder.update(bytes, &mut self.scratch);
        self.stream.write_buffer(&self.scratch)?;
        Ok(())
    }

    fn flush(mut self) -> Result<()> {
        self.scratch.clear();
        self.encoder.finish(&mut self.scratch);
        self.scratch.push(b'"');
        self.stream.write_buffer(&self.scratch)?;
        Ok(())
    }
}

pub struct JsonArrayWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    first: bool,
}

impl<'s, S: WriteStream + ?Sized> ArrayWriter for JsonArrayWriter<'s, S> {
    type Element<'a>
        = JsonWriter<'a, S>
    where
        Self: 'a;

    fn append(&mut self) -> JsonWriter<'_, S> {
        let separator = if self.first { None } else { Some(b',') };
        self.first = false;
        JsonWriter {
            stream: &mut *self.stream,
            separator,
            key: false,
        }
    }

    fn flush(self) -> Result<()> {
        self.stream.write_u8(b']')?;
        Ok(())
    }
}

pub struct JsonMapWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    first: bool,
}

impl<'s, S: WriteStream + ?Sized> MapWriter for JsonMapWriter<'s, S> {
    type Element<'a>
        = JsonWriter<'a, S>
    where
        Self: 'a;

    fn append_key(&mut self) -> JsonWriter<'_, S> {
        let separator = if self.first { None } else { Some(b',') };
        self.first = false;
        JsonWriter {
            stream: &mut *self.stream,
            separator,
            key: true,
        }
    }

    fn append_value(&mut self) -> JsonWriter<'_, S> {
        JsonWriter {
            stream: &mut *self.stream,
            separator: Some(b':'),
            key: false,
        }
    }

    fn flush(self) -> Result<()> {
        self.stream.write_u8(b'}')?;
        Ok(())
    }
}
