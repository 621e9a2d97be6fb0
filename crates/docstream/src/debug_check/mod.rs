//! Usage checks for writer and reader handles.
//!
//! The checked types implement the same traits as the handles they wrap and
//! panic when a handle is driven incorrectly:
//!
//! - a known-size payload or container receives more or fewer bytes or
//!   elements than announced;
//! - a container appends (or reads) its next child before the previous one
//!   was written (or read) to its end;
//! - map keys and values do not alternate;
//! - a reader handle is read past its end.
//!
//! Misuse the borrow checker can see is rejected at compile time instead.
//! A flushed handle is consumed, so it cannot be written again:
//!
//! ```compile_fail
//! use docstream::{cbor, ArrayWriter, DocumentWriter};
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut array = cbor::write(&mut out).write_array(None).unwrap();
//! array.flush().unwrap();
//! array.append().write_u64(1).unwrap();
//! ```
//!
//! and a child borrows its container, so two siblings cannot be open at
//! the same time:
//!
//! ```compile_fail
//! use docstream::{cbor, ArrayWriter, DocumentWriter};
//!
//! let mut out: Vec<u8> = Vec::new();
//! let mut array = cbor::write(&mut out).write_array(Some(2)).unwrap();
//! let first = array.append();
//! let second = array.append();
//! first.write_u64(1).unwrap();
//! second.write_u64(2).unwrap();
//! ```
//!
//! [`add_write_checks`] and [`add_read_checks`] apply the checks only when
//! `debug_assertions` are enabled and return their argument unchanged
//! otherwise.

mod reader;
mod writer;

pub use reader::{check_document, CheckedArray, CheckedBytes, CheckedMap, CheckedNodes};
pub use writer::{CheckedArrayWriter, CheckedMapWriter, CheckedStreamWriter, CheckedWriter};

use crate::document::{Document, Nodes};
use crate::writer::DocumentWriter;

fn retire(flag: Option<&mut bool>) {
    if let Some(flag) = flag {
        *flag = true;
    }
}

#[cfg(debug_assertions)]
pub fn add_write_checks<W: DocumentWriter>(writer: W) -> CheckedWriter<'static, W> {
    CheckedWriter::new(writer)
}

#[cfg(not(debug_assertions))]
pub fn add_write_checks<W: DocumentWriter>(writer: W) -> W {
    writer
}

#[cfg(debug_assertions)]
pub fn add_read_checks<N: Nodes>(document: Document<N>) -> Document<CheckedNodes<'static, N>> {
    check_document(document, None)
}

#[cfg(not(debug_assertions))]
pub fn add_read_checks<N: Nodes>(document: Document<N>) -> Document<N> {
    document
}
