//! Streaming CBOR reader.

use std::marker::PhantomData;

use docstream_buffers::ReadStream;

use super::constants::*;
use super::header::{read_argument, read_byte, read_length};
use crate::document::{ArrayStream, ByteStream, Document, MapStream, Nodes};
use crate::error::{Error, Result};

/// Node types of a CBOR document read from `S`.
pub struct CborNodes<'s, S: ?Sized>(PhantomData<&'s mut S>);

impl<'s, S: ReadStream + ?Sized> Nodes for CborNodes<'s, S> {
    type Text = CborBytes<'s, S>;
    type Binary = CborBytes<'s, S>;
    type Array = CborArray<'s, S>;
    type Map = CborMap<'s, S>;
}

pub type CborDocument<'s, S> = Document<CborNodes<'s, S>>;

/// Reads the data item starting with `initial`. Tags are consumed and
/// dropped, so a tagged item reads as the item itself.
pub(crate) fn read_item<'s, S: ReadStream + ?Sized>(
    stream: &'s mut S,
    initial: u8,
) -> Result<CborDocument<'s, S>> {
    let mut initial = initial;
    while initial >> 5 == MAJOR_TAG {
        read_argument(stream, initial & 0x1f)?;
        initial = read_byte(stream)?;
    }
    let info = initial & 0x1f;
    Ok(match initial >> 5 {
        MAJOR_UNSIGNED => Document::Unsigned(read_argument(stream, info)?),
        MAJOR_NEGATIVE => {
            let magnitude = read_argument(stream, info)?;
            if magnitude > i64::MAX as u64 {
                return Err(Error::Malformed("negative integer out of range"));
            }
            Document::Signed(-1 - magnitude as i64)
        }
        MAJOR_BYTES => Document::Binary(CborBytes::open(stream, MAJOR_BYTES, info)?),
        MAJOR_TEXT => Document::Text(CborBytes::open(stream, MAJOR_TEXT, info)?),
        MAJOR_ARRAY => {
            let size = read_length(stream, info)?;
            Document::Array(CborArray {
                stream,
                size,
                remaining: size,
                done: false,
            })
        }
        MAJOR_MAP => {
            let size = read_length(stream, info)?;
            Document::Map(CborMap {
                stream,
                size,
                remaining: size,
                done: false,
            })
        }
        _ => read_simple(stream, info)?,
    })
}

fn read_simple<'s, S: ReadStream + ?Sized>(stream: &mut S, info: u8) -> Result<CborDocument<'s, S>> {
    Ok(match info {
        SIMPLE_FALSE => Document::Bool(false),
        SIMPLE_TRUE => Document::Bool(true),
        SIMPLE_NULL => Document::Null,
        SIMPLE_UNDEFINED => Document::Undefined,
        SIMPLE_FLOAT16 => {
            let mut buf = [0u8; 2];
            stream.read_exact(&mut buf)?;
            Document::Double(f16_to_f64(u16::from_be_bytes(buf)))
        }
        SIMPLE_FLOAT32 => {
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf)?;
            Document::Double(f64::from(f32::from_be_bytes(buf)))
        }
        SIMPLE_FLOAT64 => {
            let mut buf = [0u8; 8];
            stream.read_exact(&mut buf)?;
            Document::Double(f64::from_be_bytes(buf))
        }
        INFO_INDEFINITE => return Err(Error::Malformed("unexpected break")),
        _ => return Err(Error::Malformed("unsupported simple value")),
    })
}

fn f16_to_f64(bits: u16) -> f64 {
    let sign = if bits & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = i32::from((bits >> 10) & 0x1f);
    let mantissa = f64::from(bits & 0x03ff);
    match exponent {
        0 => sign * mantissa * 2f64.powi(-24),
        31 if mantissa == 0.0 => sign * f64::INFINITY,
        31 => f64::NAN,
        _ => sign * (1.0 + mantissa / 1024.0) * 2f64.powi(exponent - 15),
    }
}

/// Text or byte string payload. Indefinite strings are read chunk by chunk;
/// every chunk must be a definite string of the same major type.
pub struct CborBytes<'s, S: ?Sized> {
    stream: &'s mut S,
    major: u8,
    size: Option<u64>,
    remaining: u64,
    finished: bool,
}

impl<'s, S: ReadStream + ?Sized> CborBytes<'s, S> {
    fn open(stream: &'s mut S, major: u8, info: u8) -> Result<Self> {
        let size = read_length(stream, info)?;
        Ok(Self {
            stream,
            major,
            size,
            remaining: size.unwrap_or(0),
            finished: false,
        })
    }
}

impl<S: ReadStream + ?Sized> ByteStream for CborBytes<'_, S> {
    fn size(&self) -> Option<u64> {
        self.size
    }

    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if self.remaining > 0 {
                let want = usize::try_from(self.remaining).map_or(buf.len(), |r| r.min(buf.len()));
                let read = self.stream.read_buffer(&mut buf[..want])?;
                if read == 0 {
                    return Err(Error::Malformed("unexpected end of input"));
                }
                self.remaining -= read as u64;
                return Ok(read);
            }
            if self.finished || self.size.is_some() {
                self.finished = true;
                return Ok(0);
            }
            let initial = read_byte(&mut *self.stream)?;
            if initial == BREAK {
                self.finished = true;
                return Ok(0);
            }
            let info = initial & 0x1f;
            if initial >> 5 != self.major || info == INFO_INDEFINITE {
                return Err(Error::Malformed("invalid chunk in indefinite-length string"));
            }
            self.remaining = read_argument(&mut *self.stream, info)?;
        }
    }
}

/// Element counter shared by arrays and maps: `None` means indefinite,
/// terminated by a break byte.
fn next_initial<S: ReadStream + ?Sized>(
    stream: &mut S,
    remaining: &mut Option<u64>,
    done: &mut bool,
) -> Result<Option<u8>> {
    if *done {
        return Ok(None);
    }
    match remaining {
        Some(0) => {
            *done = true;
            Ok(None)
        }
        Some(left) => {
            *left -= 1;
            read_byte(stream).map(Some)
        }
        None => match read_byte(stream)? {
            BREAK => {
                *done = true;
                Ok(None)
            }
            initial => Ok(Some(initial)),
        },
    }
}

pub struct CborArray<'s, S: ?Sized> {
    stream: &'s mut S,
    size: Option<u64>,
    remaining: Option<u64>,
    done: bool,
}

impl<'s, S: ReadStream + ?Sized> ArrayStream for CborArray<'s, S> {
    type Nodes<'a>
        = CborNodes<'a, S>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn next(&mut self) -> Result<Option<CborDocument<'_, S>>> {
        match next_initial(&mut *self.stream, &mut self.remaining, &mut self.done)? {
            Some(initial) => read_item(&mut *self.stream, initial).map(Some),
            None => Ok(None),
        }
    }
}

pub struct CborMap<'s, S: ?Sized> {
    stream: &'s mut S,
    size: Option<u64>,
    remaining: Option<u64>,
    done: bool,
}

impl<'s, S: ReadStream + ?Sized> MapStream for CborMap<'s, S> {
    type Nodes<'a>
        = CborNodes<'a, S>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        self.size
    }

    fn next_key(&mut self) -> Result<Option<CborDocument<'_, S>>> {
        match next_initial(&mut *self.stream, &mut self.remaining, &mut self.done)? {
            Some(initial) => read_item(&mut *self.stream, initial).map(Some),
            None => Ok(None),
        }
    }

    fn read_value(&mut self) -> Result<CborDocument<'_, S>> {
        let initial = read_byte(&mut *self.stream)?;
        read_item(&mut *self.stream, initial)
    }
}
