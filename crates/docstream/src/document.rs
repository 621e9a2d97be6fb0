//! The lazy, format-agnostic document model.
//!
//! A [`Document`] is one node of a tree. Scalars are carried inline; text,
//! binary, arrays and maps are lazy handles that pull bytes from the
//! underlying stream on demand. Handles for child nodes borrow their parent
//! mutably, so a sibling cannot be fetched while a child is still alive.
//! A child that is dropped before being fully read leaves the stream in the
//! middle of a value: use [`skip`] to discard what is left.

use crate::error::{Error, Result};

/// Lazy node types a format produces for one borrow of its stream.
pub trait Nodes {
    type Text: ByteStream;
    type Binary: ByteStream;
    type Array: ArrayStream;
    type Map: MapStream;
}

/// One node of a document tree.
pub enum Document<N: Nodes> {
    Null,
    Undefined,
    Bool(bool),
    Unsigned(u64),
    Signed(i64),
    Double(f64),
    Text(N::Text),
    Binary(N::Binary),
    Array(N::Array),
    Map(N::Map),
}

/// The variant of a [`Document`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Undefined,
    Bool,
    Unsigned,
    Signed,
    Double,
    Text,
    Binary,
    Array,
    Map,
}

impl<N: Nodes> Document<N> {
    pub fn kind(&self) -> Kind {
        match self {
            Document::Null => Kind::Null,
            Document::Undefined => Kind::Undefined,
            Document::Bool(_) => Kind::Bool,
            Document::Unsigned(_) => Kind::Unsigned,
            Document::Signed(_) => Kind::Signed,
            Document::Double(_) => Kind::Double,
            Document::Text(_) => Kind::Text,
            Document::Binary(_) => Kind::Binary,
            Document::Array(_) => Kind::Array,
            Document::Map(_) => Kind::Map,
        }
    }

    /// Consumes the rest of this node, discarding its content.
    pub fn skip(self) -> Result<()> {
        skip(self)
    }
}

/// Lazy producer of a text or binary payload.
pub trait ByteStream {
    /// Total payload length, when the encoding announces it up front.
    fn size(&self) -> Option<u64>;

    /// Reads the next bytes of the payload. Returns `0` once exhausted.
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        let capacity = self.size().unwrap_or(0).min(SCRATCH_SIZE as u64) as usize;
        let mut out = Vec::with_capacity(capacity);
        let mut buf = [0u8; SCRATCH_SIZE];
        loop {
            match self.read_buffer(&mut buf)? {
                0 => return Ok(out),
                n => out.extend_from_slice(&buf[..n]),
            }
        }
    }

    /// Reads the whole payload, which must be valid UTF-8.
    fn read_to_string(&mut self) -> Result<String> {
        String::from_utf8(self.read_to_vec()?).map_err(|_| Error::Malformed("invalid utf-8 in text"))
    }

    fn skip_remaining(&mut self) -> Result<()> {
        let mut buf = [0u8; SCRATCH_SIZE];
        while self.read_buffer(&mut buf)? != 0 {}
        Ok(())
    }
}

/// Lazy sequence of documents.
pub trait ArrayStream {
    type Nodes<'a>: Nodes
    where
        Self: 'a;

    /// Element count, `None` for indefinite-length arrays.
    fn size(&self) -> Option<u64>;

    /// Returns the next element, `None` once the array is exhausted.
    fn next(&mut self) -> Result<Option<Document<Self::Nodes<'_>>>>;

    fn skip_remaining(&mut self) -> Result<()> {
        while let Some(element) = self.next()? {
            skip(element)?;
        }
        Ok(())
    }
}

/// Lazy sequence of key/value pairs. Calls must alternate between
/// [`next_key`](Self::next_key) and [`read_value`](Self::read_value).
pub trait MapStream {
    type Nodes<'a>: Nodes
    where
        Self: 'a;

    /// Pair count, `None` for indefinite-length maps.
    fn size(&self) -> Option<u64>;

    /// Returns the next key, `None` once the map is exhausted.
    fn next_key(&mut self) -> Result<Option<Document<Self::Nodes<'_>>>>;

    /// Returns the value belonging to the key read last.
    fn read_value(&mut self) -> Result<Document<Self::Nodes<'_>>>;

    fn skip_remaining(&mut self) -> Result<()> {
        loop {
            let Some(key) = self.next_key()? else {
                break;
            };
            skip(key)?;
            let value = self.read_value()?;
            skip(value)?;
        }
        Ok(())
    }
}

const SCRATCH_SIZE: usize = 512;

/// Consumes `document` completely, discarding its content.
///
/// Every format is self-delimiting only once all of a value's bytes have
/// been read; this is the one place that walks a node to its end.
pub fn skip<N: Nodes>(document: Document<N>) -> Result<()> {
    match document {
        Document::Text(mut text) => text.skip_remaining(),
        Document::Binary(mut binary) => binary.skip_remaining(),
        Document::Array(mut array) => array.skip_remaining(),
        Document::Map(mut map) => map.skip_remaining(),
        _ => Ok(()),
    }
}

/// Payload type for formats that never produce a given variant.
pub enum NoBytes {}

impl ByteStream for NoBytes {
    fn size(&self) -> Option<u64> {
        match *self {}
    }

    fn read_buffer(&mut self, _buf: &mut [u8]) -> Result<usize> {
        match *self {}
    }
}
