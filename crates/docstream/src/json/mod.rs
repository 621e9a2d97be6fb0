//! JSON reading and writing.
//!
//! # Example
//!
//! ```
//! use docstream::{json, DocumentWriter, MapWriter, StreamWriter};
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut map = json::write(&mut out).write_map(None)?;
//! map.append_key().write_str("A")?;
//! map.append_value().write_u64(1)?;
//! map.append_key().write_str("C")?;
//! let mut binary = map.append_value().write_binary(Some(12))?;
//! binary.write_buffer(b"Hello world!")?;
//! binary.flush()?;
//! map.flush()?;
//! assert_eq!(out, br#"{"A":1,"C":"SGVsbG8gd29ybGQh"}"#);
//! # Ok::<(), docstream::Error>(())
//! ```

mod reader;
mod writer;

use docstream_buffers::{ReadStream, WriteStream};

pub use reader::{JsonArray, JsonDocument, JsonMap, JsonNodes, JsonText};
pub use writer::{JsonArrayWriter, JsonBase64Writer, JsonMapWriter, JsonTextWriter, JsonWriter};

use crate::debug_check::{add_read_checks, add_write_checks};
use crate::document::{Document, Nodes};
use crate::error::Result;
use crate::writer::DocumentWriter;

/// Returns a writer for one JSON value, checked in debug builds.
pub fn write<S: WriteStream + ?Sized>(stream: &mut S) -> impl DocumentWriter + '_ {
    add_write_checks(write_no_debug_check(stream))
}

pub fn write_no_debug_check<S: WriteStream + ?Sized>(stream: &mut S) -> JsonWriter<'_, S> {
    JsonWriter::new(stream)
}

/// Reads the next JSON value from `stream`, checked in debug builds.
///
/// Leading whitespace is skipped. Reading stops at the last byte of the
/// value, so several values can be read back to back from one stream.
pub fn read<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Document<impl Nodes + '_>> {
    read_no_debug_check(stream).map(add_read_checks)
}

pub fn read_no_debug_check<S: ReadStream + ?Sized>(stream: &mut S) -> Result<JsonDocument<'_, S>> {
    reader::read_value(stream)
}
