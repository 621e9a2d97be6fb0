//! Growable in-memory byte sink.

use crate::{BufferError, WriteStream};

const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Collects written bytes in memory until they are taken.
///
/// # Example
///
/// ```
/// use docstream_buffers::{WriteStream, Writer};
///
/// let mut writer = Writer::new();
/// writer.write_u8(0x01).unwrap();
/// writer.write_buffer(&[0x02, 0x03]).unwrap();
/// let data = writer.take();
/// assert_eq!(data, [0x01, 0x02, 0x03]);
/// assert!(writer.written().is_empty());
/// ```
pub struct Writer {
    buf: Vec<u8>,
    capacity: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is reserved up front and again after every [`take`](Self::take).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Discards everything written since the last take.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Bytes written since the last take.
    pub fn written(&self) -> &[u8] {
        &self.buf
    }

    /// Hands out the bytes written since the last take.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::replace(&mut self.buf, Vec::with_capacity(self.capacity))
    }
}

impl WriteStream for Writer {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BufferError> {
        Ok(())
    }

    #[inline]
    fn write_u8(&mut self, byte: u8) -> Result<(), BufferError> {
        self.buf.push(byte);
        Ok(())
    }
}
