//! Lazy, format-agnostic documents streamed between CBOR and JSON.
//!
//! Readers produce a [`Document`]: scalars are decoded eagerly, text, binary,
//! arrays and maps are handles that pull from the byte stream on demand.
//! Writers are the mirror image: every [`DocumentWriter`] writes exactly one
//! node, and container handles hand out one child writer at a time. Because
//! both sides speak the same traits, [`copy_document`] moves a document from
//! any reader to any writer without format-specific glue.
//!
//! # Modules
//!
//! - [`cbor`]: CBOR reader and writer
//! - [`json`]: JSON reader and writer
//! - [`debug_check`]: usage checks applied to handles in debug builds
//!
//! # Example
//!
//! ```
//! use docstream::{cbor, json, Value};
//!
//! let mut input = docstream::buffers::Reader::new(br#"{"a":[1,2,3],"b":3.0}"#);
//! let mut encoded: Vec<u8> = Vec::new();
//! docstream::copy_document(cbor::write(&mut encoded), json::read(&mut input)?)?;
//!
//! let mut reader = docstream::buffers::Reader::new(&encoded);
//! let value = Value::read(cbor::read(&mut reader)?)?;
//! assert_eq!(
//!     serde_json::Value::from(value),
//!     serde_json::json!({"a": [1, 2, 3], "b": 3.0})
//! );
//! # Ok::<(), docstream::Error>(())
//! ```

pub mod cbor;
pub mod debug_check;
mod document;
mod error;
pub mod json;
mod schema;
mod transcode;
mod value;
mod writer;

pub use docstream_buffers as buffers;

pub use document::{skip, ArrayStream, ByteStream, Document, Kind, MapStream, NoBytes, Nodes};
pub use error::{Error, Result};
pub use schema::SchemaMap;
pub use transcode::{copy_document, COPY_CHUNK_SIZE};
pub use value::{Value, ValueArray, ValueBytes, ValueMap, ValueNodes};
pub use writer::{ArrayWriter, DocumentWriter, MapWriter, StreamWriter, Writable};
