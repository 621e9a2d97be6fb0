//! Copying a document from any reader into any writer.

use log::trace;

use crate::document::{ArrayStream, ByteStream, Document, MapStream, Nodes};
use crate::error::Result;
use crate::writer::{ArrayWriter, DocumentWriter, MapWriter, StreamWriter};

/// Size of the buffer text and binary payloads are moved through.
pub const COPY_CHUNK_SIZE: usize = 4096;

/// Writes `document` to `writer`, consuming it completely.
///
/// Known sizes are forwarded, so a sized CBOR array stays sized; unknown
/// sizes (every JSON container) become indefinite-length items. Payloads
/// are streamed in chunks of at most [`COPY_CHUNK_SIZE`] bytes.
///
/// # Example
///
/// ```
/// use docstream::{cbor, copy_document, json};
///
/// let mut input = docstream::buffers::Reader::new(br#"{"a":[1,2,3],"b":3.0}"#);
/// let mut out: Vec<u8> = Vec::new();
/// copy_document(cbor::write(&mut out), json::read(&mut input)?)?;
/// assert_eq!(out[0], 0xbf);
/// # Ok::<(), docstream::Error>(())
/// ```
pub fn copy_document<W: DocumentWriter, N: Nodes>(writer: W, document: Document<N>) -> Result<()> {
    match document {
        Document::Null => writer.write_null(),
        Document::Undefined => writer.write_undefined(),
        Document::Bool(value) => writer.write_bool(value),
        Document::Unsigned(value) => writer.write_u64(value),
        Document::Signed(value) => writer.write_i64(value),
        Document::Double(value) => writer.write_f64(value),
        Document::Text(mut text) => {
            let sink = writer.write_text(text.size())?;
            copy_bytes(&mut text, sink)
        }
        Document::Binary(mut binary) => {
            let sink = writer.write_binary(binary.size())?;
            copy_bytes(&mut binary, sink)
        }
        Document::Array(mut array) => {
            let size = array.size();
            trace!("copy: array open, size {size:?}");
            let mut out = writer.write_array(size)?;
            let mut count = 0u64;
            while let Some(element) = array.next()? {
                copy_document(out.append(), element)?;
                count += 1;
            }
            trace!("copy: array close after {count} elements");
            out.flush()
        }
        Document::Map(mut map) => {
            let size = map.size();
            trace!("copy: map open, size {size:?}");
            let mut out = writer.write_map(size)?;
            let mut count = 0u64;
            loop {
                let Some(key) = map.next_key()? else {
                    break;
                };
                copy_document(out.append_key(), key)?;
                let value = map.read_value()?;
                copy_document(out.append_value(), value)?;
                count += 1;
            }
            trace!("copy: map close after {count} pairs");
            out.flush()
        }
    }
}

fn copy_bytes<B: ByteStream, S: StreamWriter>(source: &mut B, mut sink: S) -> Result<()> {
    let mut buf = [0u8; COPY_CHUNK_SIZE];
    loop {
        match source.read_buffer(&mut buf)? {
            0 => break,
            n => sink.write_buffer(&buf[..n])?,
        }
    }
    sink.flush()
}
