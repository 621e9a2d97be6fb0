//! Adapters from `std::io` to the byte stream traits.

use std::io::{ErrorKind, Read, Write};

use crate::{BufferError, ReadStream, WriteStream};

/// [`ReadStream`] over any [`std::io::Read`], with one byte of lookahead.
pub struct IoReader<R> {
    inner: R,
    peeked: Option<u8>,
}

impl<R: Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            peeked: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize, BufferError> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(BufferError::Io(err)),
            }
        }
    }
}

impl<R: Read> ReadStream for IoReader<R> {
    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize, BufferError> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(byte) = self.peeked.take() {
            buf[0] = byte;
            return Ok(1);
        }
        self.fill(buf)
    }

    fn peek(&mut self) -> Result<Option<u8>, BufferError> {
        if self.peeked.is_none() {
            let mut byte = [0u8; 1];
            if self.fill(&mut byte)? == 1 {
                self.peeked = Some(byte[0]);
            }
        }
        Ok(self.peeked)
    }
}

/// [`WriteStream`] over any [`std::io::Write`].
pub struct IoWriter<W> {
    inner: W,
}

impl<W: Write> IoWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> WriteStream for IoWriter<W> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), BufferError> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), BufferError> {
        self.inner.flush()?;
        Ok(())
    }
}
