//! CBOR (RFC 8949) reading and writing.
//!
//! [`write`] and [`read`] wrap the codec in the usage checks from
//! [`debug_check`](crate::debug_check) when debug assertions are enabled;
//! the `_no_debug_check` variants always return the bare codec.
//!
//! Tags are a CBOR-only feature, so they are not part of
//! [`DocumentWriter`]. [`write_tagged`] writes a tag and returns a checked
//! writer for the tagged item; [`CborWriter::write_tag`] does the same on
//! the bare codec.
//!
//! # Example
//!
//! ```
//! use docstream::{cbor, DocumentWriter, MapWriter, StreamWriter};
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut map = cbor::write(&mut out).write_map(None)?;
//! map.append_key().write_str("A")?;
//! map.append_value().write_u64(1)?;
//! map.append_key().write_str("B")?;
//! let mut text = map.append_value().write_text(Some(4))?;
//! text.write_buffer(b"text")?;
//! text.flush()?;
//! map.flush()?;
//! assert_eq!(out, [0xbf, 0x61, b'A', 0x01, 0x61, b'B', 0x64, b't', b'e', b'x', b't', 0xff]);
//! # Ok::<(), docstream::Error>(())
//! ```

mod constants;
mod header;
mod reader;
mod writer;

use docstream_buffers::{ReadStream, WriteStream};

pub use constants::SELF_DESCRIBE_TAG;
pub use header::encode_header;
pub use reader::{CborArray, CborBytes, CborDocument, CborMap, CborNodes};
pub use writer::{CborArrayWriter, CborMapWriter, CborStreamWriter, CborWriter};

use crate::debug_check::{add_read_checks, add_write_checks};
use crate::document::{Document, Nodes};
use crate::error::Result;
use crate::writer::DocumentWriter;

/// Returns a writer for one CBOR document, checked in debug builds.
pub fn write<S: WriteStream + ?Sized>(stream: &mut S) -> impl DocumentWriter + '_ {
    add_write_checks(write_no_debug_check(stream))
}

/// Writes `tag`, then returns a writer for the tagged item, checked in
/// debug builds.
///
/// ```
/// use docstream::{cbor, DocumentWriter};
///
/// let mut out: Vec<u8> = Vec::new();
/// cbor::write_tagged(&mut out, cbor::SELF_DESCRIBE_TAG)?.write_u64(1)?;
/// assert_eq!(out, [0xd9, 0xd9, 0xf7, 0x01]);
/// # Ok::<(), docstream::Error>(())
/// ```
pub fn write_tagged<S: WriteStream + ?Sized>(stream: &mut S, tag: u64) -> Result<impl DocumentWriter + '_> {
    write_no_debug_check(stream).write_tag(tag).map(add_write_checks)
}

pub fn write_no_debug_check<S: WriteStream + ?Sized>(stream: &mut S) -> CborWriter<'_, S> {
    CborWriter::new(stream)
}

/// Reads the next CBOR document from `stream`, checked in debug builds.
pub fn read<S: ReadStream + ?Sized>(stream: &mut S) -> Result<Document<impl Nodes + '_>> {
    read_no_debug_check(stream).map(add_read_checks)
}

pub fn read_no_debug_check<S: ReadStream + ?Sized>(stream: &mut S) -> Result<CborDocument<'_, S>> {
    let initial = header::read_byte(stream)?;
    reader::read_item(stream, initial)
}
