use crate::error::Result;
use crate::writer::{ArrayWriter, DocumentWriter, MapWriter, StreamWriter};

use super::retire;

/// Checking decorator around a [`DocumentWriter`].
pub struct CheckedWriter<'p, W> {
    inner: W,
    retired: Option<&'p mut bool>,
}

impl<W: DocumentWriter> CheckedWriter<'static, W> {
    /// Wraps a root writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            retired: None,
        }
    }
}

impl<'p, W: DocumentWriter> CheckedWriter<'p, W> {
    fn child(inner: W, retired: &'p mut bool) -> Self {
        *retired = false;
        Self {
            inner,
            retired: Some(retired),
        }
    }
}

impl<'p, W: DocumentWriter> DocumentWriter for CheckedWriter<'p, W> {
    type Text = CheckedStreamWriter<'p, W::Text>;
    type Binary = CheckedStreamWriter<'p, W::Binary>;
    type Array = CheckedArrayWriter<'p, W::Array>;
    type Map = CheckedMapWriter<'p, W::Map>;

    fn write_null(self) -> Result<()> {
        let result = self.inner.write_null();
        retire_after(self.retired, result)
    }

    fn write_undefined(self) -> Result<()> {
        let result = self.inner.write_undefined();
        retire_after(self.retired, result)
    }

    fn write_bool(self, value: bool) -> Result<()> {
        let result = self.inner.write_bool(value);
        retire_after(self.retired, result)
    }

    fn write_u64(self, value: u64) -> Result<()> {
        let result = self.inner.write_u64(value);
        retire_after(self.retired, result)
    }

    fn write_i64(self, value: i64) -> Result<()> {
        let result = self.inner.write_i64(value);
        retire_after(self.retired, result)
    }

    fn write_f64(self, value: f64) -> Result<()> {
        let result = self.inner.write_f64(value);
        retire_after(self.retired, result)
    }

    fn write_text(self, size: Option<u64>) -> Result<Self::Text> {
        Ok(CheckedStreamWriter::new(self.inner.write_text(size)?, size, self.retired))
    }

    fn write_binary(self, size: Option<u64>) -> Result<Self::Binary> {
        Ok(CheckedStreamWriter::new(self.inner.write_binary(size)?, size, self.retired))
    }

    fn write_array(self, size: Option<u64>) -> Result<Self::Array> {
        Ok(CheckedArrayWriter {
            inner: self.inner.write_array(size)?,
            size,
            count: 0,
            child_done: true,
            retired: self.retired,
        })
    }

    fn write_map(self, size: Option<u64>) -> Result<Self::Map> {
        Ok(CheckedMapWriter {
            inner: self.inner.write_map(size)?,
            size,
            count: 0,
            expect_value: false,
            child_done: true,
            retired: self.retired,
        })
    }
}

fn retire_after(retired: Option<&mut bool>, result: Result<()>) -> Result<()> {
    result?;
    retire(retired);
    Ok(())
}

/// Text or binary payload that must receive exactly its announced size.
pub struct CheckedStreamWriter<'p, S> {
    inner: S,
    size: Option<u64>,
    written: u64,
    retired: Option<&'p mut bool>,
}

impl<'p, S: StreamWriter> CheckedStreamWriter<'p, S> {
    fn new(inner: S, size: Option<u64>, retired: Option<&'p mut bool>) -> Self {
        Self {
            inner,
            size,
            written: 0,
            retired,
        }
    }
}

impl<S: StreamWriter> StreamWriter for CheckedStreamWriter<'_, S> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        self.written += bytes.len() as u64;
        if let Some(size) = self.size {
            assert!(
                self.written <= size,
                "{} bytes written to a payload of size {size}",
                self.written
            );
        }
        self.inner.write_buffer(bytes)
    }

    fn flush(self) -> Result<()> {
        if let Some(size) = self.size {
            assert_eq!(
                self.written, size,
                "payload of size {size} flushed after {} bytes",
                self.written
            );
        }
        let result = self.inner.flush();
        retire_after(self.retired, result)
    }
}

pub struct CheckedArrayWriter<'p, A> {
    inner: A,
    size: Option<u64>,
    count: u64,
    child_done: bool,
    retired: Option<&'p mut bool>,
}

impl<'p, A: ArrayWriter> ArrayWriter for CheckedArrayWriter<'p, A> {
    type Element<'a>
        = CheckedWriter<'a, A::Element<'a>>
    where
        Self: 'a;

    fn append(&mut self) -> Self::Element<'_> {
        assert!(self.child_done, "array element appended before the previous one was written");
        self.count += 1;
        if let Some(size) = self.size {
            assert!(self.count <= size, "more than {size} elements appended to an array");
        }
        CheckedWriter::child(self.inner.append(), &mut self.child_done)
    }

    fn flush(self) -> Result<()> {
        assert!(self.child_done, "array flushed before its last element was written");
        if let Some(size) = self.size {
            assert_eq!(
                self.count, size,
                "array of size {size} flushed after {} elements",
                self.count
            );
        }
        let result = self.inner.flush();
        retire_after(self.retired, result)
    }
}

pub struct CheckedMapWriter<'p, M> {
    inner: M,
    size: Option<u64>,
    count: u64,
    expect_value: bool,
    child_done: bool,
    retired: Option<&'p mut bool>,
}

impl<'p, M: MapWriter> MapWriter for CheckedMapWriter<'p, M> {
    type Element<'a>
        = CheckedWriter<'a, M::Element<'a>>
    where
        Self: 'a;

    fn append_key(&mut self) -> Self::Element<'_> {
        assert!(self.child_done, "map key appended before the previous entry was written");
        assert!(!self.expect_value, "map key appended where a value was expected");
        self.count += 1;
        if let Some(size) = self.size {
            assert!(self.count <= size, "more than {size} entries appended to a map");
        }
        self.expect_value = true;
        CheckedWriter::child(self.inner.append_key(), &mut self.child_done)
    }

    fn append_value(&mut self) -> Self::Element<'_> {
        assert!(self.child_done, "map value appended before its key was written");
        assert!(self.expect_value, "map value appended without a key");
        self.expect_value = false;
        CheckedWriter::child(self.inner.append_value(), &mut self.child_done)
    }

    fn flush(self) -> Result<()> {
        assert!(self.child_done, "map flushed before its last entry was written");
        assert!(!self.expect_value, "map flushed after a key without a value");
        if let Some(size) = self.size {
            assert_eq!(
                self.count, size,
                "map of size {size} flushed after {} entries",
                self.count
            );
        }
        let result = self.inner.flush();
        retire_after(self.retired, result)
    }
}
