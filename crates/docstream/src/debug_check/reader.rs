use std::marker::PhantomData;

use crate::document::{ArrayStream, ByteStream, Document, MapStream, Nodes};
use crate::error::Result;

use super::retire;

/// Checked counterparts of the node types of `N`.
pub struct CheckedNodes<'p, N>(PhantomData<(&'p mut bool, N)>);

impl<'p, N: Nodes> Nodes for CheckedNodes<'p, N> {
    type Text = CheckedBytes<'p, N::Text>;
    type Binary = CheckedBytes<'p, N::Binary>;
    type Array = CheckedArray<'p, N::Array>;
    type Map = CheckedMap<'p, N::Map>;
}

/// Wraps the handles of `document`. `retired` is set once the document has
/// been read to its end; scalars are complete immediately.
pub fn check_document<'p, N: Nodes>(
    document: Document<N>,
    retired: Option<&'p mut bool>,
) -> Document<CheckedNodes<'p, N>> {
    match document {
        Document::Null => scalar(Document::Null, retired),
        Document::Undefined => scalar(Document::Undefined, retired),
        Document::Bool(value) => scalar(Document::Bool(value), retired),
        Document::Unsigned(value) => scalar(Document::Unsigned(value), retired),
        Document::Signed(value) => scalar(Document::Signed(value), retired),
        Document::Double(value) => scalar(Document::Double(value), retired),
        Document::Text(inner) => Document::Text(CheckedBytes::new(inner, retired)),
        Document::Binary(inner) => Document::Binary(CheckedBytes::new(inner, retired)),
        Document::Array(inner) => Document::Array(CheckedArray {
            inner,
            count: 0,
            child_done: true,
            exhausted: false,
            retired,
        }),
        Document::Map(inner) => Document::Map(CheckedMap {
            inner,
            expect_value: false,
            child_done: true,
            exhausted: false,
            retired,
        }),
    }
}

fn scalar<N: Nodes>(document: Document<N>, retired: Option<&mut bool>) -> Document<N> {
    retire(retired);
    document
}

fn busy(flag: &mut bool) -> &mut bool {
    *flag = false;
    flag
}

/// Payload that must be read to its end, and not beyond. A sized payload
/// counts as finished once its last byte has been read.
pub struct CheckedBytes<'p, B> {
    inner: B,
    read: u64,
    exhausted: bool,
    retired: Option<&'p mut bool>,
}

impl<'p, B: ByteStream> CheckedBytes<'p, B> {
    fn new(inner: B, mut retired: Option<&'p mut bool>) -> Self {
        if inner.size() == Some(0) {
            retire(retired.take());
        }
        Self {
            inner,
            read: 0,
            exhausted: false,
            retired,
        }
    }
}

impl<B: ByteStream> ByteStream for CheckedBytes<'_, B> {
    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn read_buffer(&mut self, buf: &mut [u8]) -> Result<usize> {
        assert!(!self.exhausted, "payload read past its end");
        let n = self.inner.read_buffer(buf)?;
        self.read += n as u64;
        let size = self.inner.size();
        if let Some(size) = size {
            assert!(self.read <= size, "payload of size {size} produced {} bytes", self.read);
            if self.read == size {
                retire(self.retired.take());
            }
        }
        if n == 0 && !buf.is_empty() {
            self.exhausted = true;
            if let Some(size) = size {
                assert_eq!(self.read, size, "payload of size {size} ended after {} bytes", self.read);
            }
            retire(self.retired.take());
        }
        Ok(n)
    }
}

pub struct CheckedArray<'p, A> {
    inner: A,
    count: u64,
    child_done: bool,
    exhausted: bool,
    retired: Option<&'p mut bool>,
}

impl<'p, A: ArrayStream> ArrayStream for CheckedArray<'p, A> {
    type Nodes<'a>
        = CheckedNodes<'a, A::Nodes<'a>>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn next(&mut self) -> Result<Option<Document<Self::Nodes<'_>>>> {
        assert!(!self.exhausted, "array read past its end");
        assert!(
            self.child_done,
            "next array element requested before the previous one was read to its end"
        );
        let size = self.inner.size();
        match self.inner.next()? {
            Some(element) => {
                self.count += 1;
                if let Some(size) = size {
                    assert!(self.count <= size, "array of size {size} produced more elements");
                }
                Ok(Some(check_document(element, Some(busy(&mut self.child_done)))))
            }
            None => {
                if let Some(size) = size {
                    assert_eq!(self.count, size, "array of size {size} ended after {} elements", self.count);
                }
                self.exhausted = true;
                retire(self.retired.take());
                Ok(None)
            }
        }
    }
}

pub struct CheckedMap<'p, M> {
    inner: M,
    expect_value: bool,
    child_done: bool,
    exhausted: bool,
    retired: Option<&'p mut bool>,
}

impl<'p, M: MapStream> MapStream for CheckedMap<'p, M> {
    type Nodes<'a>
        = CheckedNodes<'a, M::Nodes<'a>>
    where
        Self: 'a;

    fn size(&self) -> Option<u64> {
        self.inner.size()
    }

    fn next_key(&mut self) -> Result<Option<Document<Self::Nodes<'_>>>> {
        assert!(!self.exhausted, "map read past its end");
        assert!(
            self.child_done,
            "next map key requested before the previous value was read to its end"
        );
        assert!(!self.expect_value, "next map key requested before the value of the last one");
        match self.inner.next_key()? {
            Some(key) => {
                self.expect_value = true;
                Ok(Some(check_document(key, Some(busy(&mut self.child_done)))))
            }
            None => {
                self.exhausted = true;
                retire(self.retired.take());
                Ok(None)
            }
        }
    }

    fn read_value(&mut self) -> Result<Document<Self::Nodes<'_>>> {
        assert!(self.child_done, "map value requested before its key was read to its end");
        assert!(self.expect_value, "map value requested without a key");
        self.expect_value = false;
        let value = self.inner.read_value()?;
        Ok(check_document(value, Some(busy(&mut self.child_done))))
    }
}
