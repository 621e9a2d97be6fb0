//! Byte stream primitives for docstream.
//!
//! Every format reader pulls bytes through [`ReadStream`] and every format
//! writer pushes bytes through [`WriteStream`]. The traits carry no framing:
//! a reader sees a plain sequence of bytes ending at end-of-stream, a writer
//! appends bytes and flushes them on request.
//!
//! # Overview
//!
//! - [`Reader`] - reads from a byte slice with cursor tracking
//! - [`Writer`] - writes to an auto-growing in-memory buffer
//! - [`IoReader`] / [`IoWriter`] - adapters over `std::io`
//!
//! # Example
//!
//! ```
//! use docstream_buffers::{ReadStream, Reader, WriteStream, Writer};
//!
//! let mut writer = Writer::new();
//! writer.write_u8(0x01).unwrap();
//! writer.write_buffer(b"hello").unwrap();
//! let data = writer.take();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.read_u8().unwrap(), Some(0x01));
//! let mut word = [0u8; 5];
//! reader.read_exact(&mut word).unwrap();
//! assert_eq!(&word, b"hello");
//! assert_eq!(reader.read_u8().unwrap(), None);
//! ```

mod io;
mod reader;
mod writer;

pub use io::{IoReader, IoWriter};
pub use reader::Reader;
pub use writer::Writer;

/// Error type for byte stream operations.
#[derive(Debug)]
pub enum BufferError {
    /// Attempted to read past the end of the stream.
    EndOfBuffer,
    /// The underlying I/O object failed.
    Io(std::io::Error),
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl std::error::Error for BufferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BufferError::EndOfBuffer => None,
            BufferError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for BufferError {
    fn from(err: std::io::Error) -> Self {
        BufferError::Io(err)
    }
}

/// Source of bytes.
pub trait ReadStream {
    /// Reads up to `buf.len()` bytes. Returns `0` only at end-of-stream
    /// (or when `buf` is empty).
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize, BufferError>;

    /// Returns the next byte without consuming it, `None` at end-of-stream.
    fn peek(&mut self) -> Result<Option<u8>, BufferError>;

    /// Reads a single byte, `None` at end-of-stream.
    fn read_u8(&mut self) -> Result<Option<u8>, BufferError> {
        let mut byte = [0u8; 1];
        match self.read_buffer(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Fills `buf` completely or fails with [`BufferError::EndOfBuffer`].
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), BufferError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_buffer(&mut buf[filled..])? {
                0 => return Err(BufferError::EndOfBuffer),
                n => filled += n,
            }
        }
        Ok(())
    }
}

/// Sink of bytes.
pub trait WriteStream {
    /// Appends all of `bytes` to the stream.
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), BufferError>;

    /// Pushes any buffered bytes to their final destination.
    fn flush(&mut self) -> Result<(), BufferError>;

    /// Appends a single byte.
    fn write_u8(&mut self, byte: u8) -> Result<(), BufferError> {
        self.write_buffer(&[byte])
    }
}

impl<T: ReadStream + ?Sized> ReadStream for &mut T {
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize, BufferError> {
        (**self).read_buffer(buf)
    }

    fn peek(&mut self) -> Result<Option<u8>, BufferError> {
        (**self).peek()
    }
}

impl<T: WriteStream + ?Sized> WriteStream for &mut T {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        (**self).write_buffer(bytes)
    }

    fn flush(&mut self) -> Result<(), BufferError> {
        (**self).flush()
    }
}

impl WriteStream for Vec<u8> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BufferError> {
        Ok(())
    }
}
