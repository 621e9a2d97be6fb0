//! Byte slice reader with cursor tracking.

use crate::{BufferError, ReadStream};

/// A reader over a borrowed byte slice.
///
/// The reader maintains a cursor position; [`ReadStream`] reads advance it
/// and [`ReadStream::peek`] does not.
///
/// # Example
///
/// ```
/// use docstream_buffers::{ReadStream, Reader};
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.read_u8().unwrap(), Some(0x01));
/// assert_eq!(reader.size(), 3);
/// ```
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns the bytes not read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl ReadStream for Reader<'_> {
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize, BufferError> {
        let n = buf.len().min(self.size());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn peek(&mut self) -> Result<Option<u8>, BufferError> {
        if self.pos < self.data.len() {
            Ok(Some(self.data[self.pos]))
        } else {
            Ok(None)
        }
    }

    fn read_u8(&mut self) -> Result<Option<u8>, BufferError> {
        if self.pos < self.data.len() {
            let byte = self.data[self.pos];
            self.pos += 1;
            Ok(Some(byte))
        } else {
            Ok(None)
        }
    }
}
