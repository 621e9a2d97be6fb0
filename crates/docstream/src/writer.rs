//! The writer side of the document model.
//!
//! A [`DocumentWriter`] stands for exactly one node. Every method consumes
//! it: scalars are written immediately, text/binary/array/map calls return
//! a handle that must be driven to its `flush`. Container handles hand out
//! child writers that borrow the container, so a child is always finished
//! before the container can append the next one.

use crate::document::{Document, Nodes};
use crate::error::Result;
use crate::transcode::copy_document;

/// Sink for a text or binary payload.
pub trait StreamWriter {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<()>;

    /// Finishes the payload.
    fn flush(self) -> Result<()>;
}

pub trait ArrayWriter {
    type Element<'a>: DocumentWriter
    where
        Self: 'a;

    fn append(&mut self) -> Self::Element<'_>;

    /// Closes the array. Known-size arrays must have received exactly the
    /// announced number of elements.
    fn flush(self) -> Result<()>;
}

/// Map handle; `append_key` and `append_value` must alternate.
pub trait MapWriter {
    type Element<'a>: DocumentWriter
    where
        Self: 'a;

    fn append_key(&mut self) -> Self::Element<'_>;

    fn append_value(&mut self) -> Self::Element<'_>;

    fn flush(self) -> Result<()>;
}

/// Writer for one document node.
///
/// `size` arguments are `Some(n)` for known-size payloads and containers and
/// `None` for indefinite ones.
pub trait DocumentWriter: Sized {
    type Text: StreamWriter;
    type Binary: StreamWriter;
    type Array: ArrayWriter;
    type Map: MapWriter;

    fn write_null(self) -> Result<()>;

    fn write_undefined(self) -> Result<()>;

    fn write_bool(self, value: bool) -> Result<()>;

    fn write_u64(self, value: u64) -> Result<()>;

    fn write_i64(self, value: i64) -> Result<()>;

    fn write_f64(self, value: f64) -> Result<()>;

    fn write_text(self, size: Option<u64>) -> Result<Self::Text>;

    fn write_binary(self, size: Option<u64>) -> Result<Self::Binary>;

    fn write_array(self, size: Option<u64>) -> Result<Self::Array>;

    fn write_map(self, size: Option<u64>) -> Result<Self::Map>;

    /// Writes any [`Writable`] value: scalars, strings, byte slices,
    /// materialized values and documents produced by any reader.
    fn write<T: Writable>(self, value: T) -> Result<()> {
        value.write_to(self)
    }

    fn write_str(self, value: &str) -> Result<()> {
        let mut text = self.write_text(Some(value.len() as u64))?;
        text.write_buffer(value.as_bytes())?;
        text.flush()
    }

    fn write_bytes(self, value: &[u8]) -> Result<()> {
        let mut binary = self.write_binary(Some(value.len() as u64))?;
        binary.write_buffer(value)?;
        binary.flush()
    }

    fn write_document<N: Nodes>(self, document: Document<N>) -> Result<()> {
        copy_document(self, document)
    }
}

/// A value that knows how to write itself to any [`DocumentWriter`].
pub trait Writable {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()>;
}

impl Writable for () {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_null()
    }
}

impl Writable for bool {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_bool(self)
    }
}

macro_rules! writable_unsigned {
    ($($ty:ty),*) => {$(
        impl Writable for $ty {
            fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
                writer.write_u64(u64::from(self))
            }
        }
    )*};
}

macro_rules! writable_signed {
    ($($ty:ty),*) => {$(
        impl Writable for $ty {
            fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
                writer.write_i64(i64::from(self))
            }
        }
    )*};
}

writable_unsigned!(u8, u16, u32, u64);
writable_signed!(i8, i16, i32, i64);

impl Writable for f32 {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_f64(f64::from(self))
    }
}

impl Writable for f64 {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_f64(self)
    }
}

impl Writable for &str {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_str(self)
    }
}

impl Writable for &[u8] {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        writer.write_bytes(self)
    }
}

impl<T: Writable> Writable for Option<T> {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        match self {
            Some(value) => value.write_to(writer),
            None => writer.write_null(),
        }
    }
}

impl<N: Nodes> Writable for Document<N> {
    fn write_to<W: DocumentWriter>(self, writer: W) -> Result<()> {
        copy_document(writer, self)
    }
}
