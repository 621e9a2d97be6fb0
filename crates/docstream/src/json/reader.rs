//! Streaming JSON reader.
//!
//! Strings are not buffered: a [`JsonText`] decodes escapes while the caller
//! pulls bytes. Numbers without a fraction or exponent become
//! [`Document::Unsigned`] (or [`Document::Signed`] when negative) as long as
//! they fit in 64 bits; everything else becomes [`Document::Double`].

use std::marker::PhantomData;

use docstream_buffers::ReadStream;

use crate::document::{ArrayStream, ByteStream, Document, MapStream, NoBytes, Nodes};
use crate::error::{Error, Result};

/// Node types of a JSON document read from `S`. JSON has no binary, so
/// [`Document::Binary`] is never produced.
pub struct JsonNodes<'s, S: ?Sized>(PhantomData<&'s mut S>);

impl<'s, S: ReadStream + ?Sized> Nodes for JsonNodes<'s, S> {
    type Text = JsonText<'s, S>;
    type Binary = NoBytes;
    type Array = JsonArray<'s, S>;
    type Map = JsonMap<'s, S>;
}

pub type JsonDocument<'s, S> = Document<JsonNodes<'s, S>>;

const UNEXPECTED_END: Error = Error::Malformed("unexpected end of input");

fn next_byte<S: ReadStream + ?Sized>(stream: &mut S) -> Result<u8> {
    stream.read_u8()?.ok_or(UNEXPECTED_END)
}

pub(crate) fn skip_whitespace<S: ReadStream + ?Sized>(stream: &mut S) -> Result<()> {
    while let Some(b' ' | b'\t' | b'\n' | b'\r') = stream.peek()? {
        stream.read_u8()?;
    }
    Ok(())
}

fn expect_literal<S: ReadStream + ?Sized>(stream: &mut S, literal: &[u8]) -> Result<()> {
    for &expected in literal {
        if next_byte(stream)? != expected {
            return Err(Error::Malformed("invalid literal"));
        }
    }
    Ok(())
}

/// Reads the value starting at the next non-whitespace byte.
pub(crate) fn read_value<'s, S: ReadStream + ?Sized>(stream: &'s mut S) -> Result<JsonDocument<'s, S>> {
    skip_whitespace(stream)?;
    let Some(first) = stream.peek()? else {
        return Err(UNEXPECTED_END);
    };
    match first {
        b'"' => {
            stream.read_u8()?;
            Ok(Document::Text(JsonText::new(stream)))
        }
        b'[' => {
            stream.read_u8()?;
            Ok(Document::Array(JsonArray::new(stream)))
        }
        b'{' => {
            stream.read_u8()?;
            Ok(Document::Map(JsonMap::new(stream)))
        }
        b'n' => expect_literal(stream, b"null").map(|()| Document::Null),
        b't' => expect_literal(stream, b"true").map(|()| Document::Bool(true)),
        b'f' => expect_literal(stream, b"false").map(|()| Document::Bool(false)),
        b'-' | b'0'..=b'9' => read_number(stream),
        _ => Err(Error::Malformed("unexpected character")),
    }
}

fn take_digits<S: ReadStream + ?Sized>(stream: &mut S, out: &mut String) -> Result<usize> {
    let mut count = 0;
    while let Some(b @ b'0'..=b'9') = stream.peek()? {
        stream.read_u8()?;
        out.push(char::from(b));
        count += 1;
    }
    Ok(count)
}

fn read_number<'s, S: ReadStream + ?Sized>(stream: &mut S) -> Result<JsonDocument<'s, S>> {
    const INVALID: Error = Error::Malformed("invalid number");
    let mut text = String::new();
    let negative = stream.peek()? == Some(b'-');
    if negative {
        stream.read_u8()?;
        text.push('-');
    }
    let start = text.len();
    match take_digits(stream, &mut text)? {
        0 => return Err(INVALID),
        1 => {}
        // no leading zeros
        _ if text.as_bytes()[start] == b'0' => return Err(INVALID),
        _ => {}
    }
    let mut integral = true;
    if stream.peek()? == Some(b'.') {
        stream.read_u8()?;
        text.push('.');
        integral = false;
        if take_digits(stream, &mut text)? == 0 {
            return Err(INVALID);
        }
    }
    if let Some(b'e' | b'E') = stream.peek()? {
        stream.read_u8()?;
        text.push('e');
        integral = false;
        if let Some(sign @ (b'+' | b'-')) = stream.peek()? {
            stream.read_u8()?;
            text.push(char::from(sign));
        }
        if take_digits(stream, &mut text)? == 0 {
            return Err(INVALID);
        }
    }
    if integral {
        if negative {
            if let Ok(value) = text.parse::<i64>() {
                return Ok(Document::Signed(value));
            }
        } else if let Ok(value) = text.parse::<u64>() {
            return Ok(Document::Unsigned(value));
        }
    }
    text.parse::<f64>().map(Document::Double).map_err(|_| INVALID)
}

/// String payload with escapes decoded to UTF-8.
pub struct JsonText<'s, S: ?Sized> {
    stream: &'s mut S,
    decoded: [u8; 4],
    decoded_pos: usize,
    decoded_len: usize,
    finished: bool,
}

impl<'s, S: ReadStream + ?Sized> JsonText<'s, S> {
    fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            decoded: [0; 4],
            decoded_pos: 0,
            decoded_len: 0,
            finished: false,
        }
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut value = 0;
        for _ in 0..4 {
            let digit = char::from(next_byte(&mut *self.stream)?)
                .to_digit(16)
                .ok_or(Error::Malformed("invalid unicode escape"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn read_escape(&mut self) -> Result<char> {
        Ok(match next_byte(&mut *self.stream)? {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let unit = self.read_hex4()?;
                let code = match unit {
                    0xd800..=0xdbff => {
                        expect_literal(&mut *self.stream, b"\\u")
                            .map_err(|_| Error::Malformed("unpaired surrogate"))?;
                        let low = self.read_hex4()?;
                        if !(0xdc00..=0xdfff).contains(&low) {
                            return Err(Error::Malformed("unpaired surrogate"));
                        }
                        0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00)
                    }
                    0xdc00..=0xdfff => return Err(Error::Malformed("unpaired surrogate")),
                    _ => unit,
                };
                char::from_u32(code).ok_or(Error::Malformed("invalid unicode escape"))?
            }
            _ => return Err(Error::Malformed("invalid escape")),
        })
    }
}

impl<S: ReadStream + ?Sized> ByteStream for JsonText<'_, S> {
    fn size(&self) -> Option<u64> {
        None
    }

    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            if self.decoded_pos < self.decoded_len {
                let available = &self.decoded[self.decoded_pos..self.decoded_len];
                let take = available.len().min(buf.len() - n);
                buf[n..n + take].copy_from_slice(&available[..take]);
                self.decoded_pos += take;
                n += take;
                continue;
            }
            if self.finished {
                break;
            }
            match self.stream.peek()? {
                None => return Err(UNEXPECTED_END),
                Some(b'"') => {
                    self.stream.read_u8()?;
                    self.finished = true;
                }
                Some(b'\\') => {
                    self.stream.read_u8()?;
                    let ch = self.read_escape()?;
                    self.decoded_len = ch.encode_utf8(&mut self.decoded).len();
                    self.decoded_pos = 0;
                }
                Some(0x00..=0x1f) => return Err(Error::Malformed("control character in string")),
                Some(_) => {
                    while n < buf.len() {
                        match self.stream.peek()? {
                            Some(b) if b != b'"' && b != b'\\' && b >= 0x20 => {
                                self.stream.read_u8()?;
                                buf[n] = b;
                                n += 1;
                            }
                            _ => break,
                        }
                    }
                }
            }
        }
        Ok(n)
    }
}

/// Reads `,` before every element but the first, and the closing delimiter.
/// Returns `false` once the container is closed.
fn next_entry<S: ReadStream + ?Sized>(stream: &mut S, first: &mut bool, close: u8) -> Result<bool> {
    skip_whitespace(stream)?;
    match stream.peek()? {
        None => Err(UNEXPECTED_END),
        Some(b) if b == close => {
            stream.read_u8()?;
            Ok(false)
        }
        Some(b',') if !*first => {
            stream.read_u8()?;
            Ok(true)
        }
        Some(_) if *first => {
            *first = false;
            Ok(true)
        }
        Some(_) => Err(Error::Malformed("expected ',' or closing delimiter")),
    }
}

pub struct JsonArray<'s, S: ?Sized> {
    stream: &'s mut S,
    first: bool,
    done: bool,
}

impl<'s, S: ReadStream + ?Sized> JsonArray<'s, S> {
    fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            first: true,
            done: false,
        }
    }
}

impl<'s, S: ReadStream + ?Sized> ArrayStream for JsonArray<'s, S> {
    type Nodes<'a>
        = JsonNodes<'a, S>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        None
    }

    fn next(&mut self) -> Result<Option<JsonDocument<'_, S>>> {
        if self.done {
            return Ok(None);
        }
        if !next_entry(&mut *self.stream, &mut self.first, b']')? {
            self.done = true;
            return Ok(None);
        }
        read_value(&mut *self.stream).map(Some)
    }
}

/// Object reader. Keys must be strings.
pub struct JsonMap<'s, S: ?Sized> {
    stream: &'s mut S,
    first: bool,
    done: bool,
}

impl<'s, S: ReadStream + ?Sized> JsonMap<'s, S> {
    fn new(stream: &'s mut S) -> Self {
        Self {
            stream,
            first: true,
            done: false,
        }
    }
}

impl<'s, S: ReadStream + ?Sized> MapStream for JsonMap<'s, S> {
    type Nodes<'a>
        = JsonNodes<'a, S>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        None
    }

    fn next_key(&mut self) -> Result<Option<JsonDocument<'_, S>>> {
        if self.done {
            return Ok(None);
        }
        if !next_entry(&mut *self.stream, &mut self.first, b'}')? {
            self.done = true;
            return Ok(None);
        }
        skip_whitespace(&mut *self.stream)?;
        if self.stream.peek()? != Some(b'"') {
            return Err(Error::Malformed("object key must be a string"));
        }
        read_value(&mut *self.stream).map(Some)
    }

    fn read_value(&mut self) -> Result<JsonDocument<'_, S>> {
        skip_whitespace(&mut *self.stream)?;
        if next_byte(&mut *self.stream)? != b':' {
            return Err(Error::Malformed("expected ':'"));
        }
        read_value(&mut *self.stream)
    }
}
