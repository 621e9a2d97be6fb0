//! Streaming CBOR writer.

use docstream_buffers::WriteStream;

use super::constants::*;
use super::header::{write_header, write_indefinite_header};
use crate::error::Result;
use crate::writer::{ArrayWriter, DocumentWriter, MapWriter, StreamWriter};

/// Writes one CBOR data item to a byte stream.
///
/// Integers use the shortest header, doubles are always written as 64-bit
/// floats. Passing `None` as a size starts an indefinite-length item, closed
/// with a break byte when its handle is flushed.
pub struct CborWriter<'s, S: ?Sized> {
    stream: &'s mut S,
}

impl<'s, S: WriteStream + ?Sized> CborWriter<'s, S> {
    pub fn new(stream: &'s mut S) -> Self {
        Self { stream }
    }

    /// Writes a semantic tag; the returned writer writes the tagged item.
    pub fn write_tag(self, tag: u64) -> Result<Self> {
        write_header(self.stream, MAJOR_TAG, tag)?;
        Ok(self)
    }

    /// Prefixes the item with the self-describe tag (`d9 d9 f7`).
    pub fn write_self_described(self) -> Result<Self> {
        self.write_tag(SELF_DESCRIBE_TAG)
    }

    fn write_simple(self, value: u8) -> Result<()> {
        self.stream.write_u8(initial_byte(MAJOR_SIMPLE, value))?;
        Ok(())
    }

    fn open(self, major: u8, size: Option<u64>) -> Result<&'s mut S> {
        match size {
            Some(len) => write_header(self.stream, major, len)?,
            None => write_indefinite_header(self.stream, major)?,
        }
        Ok(self.stream)
    }
}

impl<'s, S: WriteStream + ?Sized> DocumentWriter for CborWriter<'s, S> {
    type Text = CborStreamWriter<'s, S>;
    type Binary = CborStreamWriter<'s, S>;
    type Array = CborArrayWriter<'s, S>;
    type Map = CborMapWriter<'s, S>;

    fn write_null(self) -> Result<()> {
        self.write_simple(SIMPLE_NULL)
    }

    fn write_undefined(self) -> Result<()> {
        self.write_simple(SIMPLE_UNDEFINED)
    }

    fn write_bool(self, value: bool) -> Result<()> {
        self.write_simple(if value { SIMPLE_TRUE } else { SIMPLE_FALSE })
    }

    fn write_u64(self, value: u64) -> Result<()> {
        write_header(self.stream, MAJOR_UNSIGNED, value)
    }

    fn write_i64(self, value: i64) -> Result<()> {
        if value >= 0 {
            write_header(self.stream, MAJOR_UNSIGNED, value as u64)
        } else {
            write_header(self.stream, MAJOR_NEGATIVE, (-1 - value) as u64)
        }
    }

    fn write_f64(self, value: f64) -> Result<()> {
        let mut buf = [0u8; 9];
        buf[0] = initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT64);
        buf[1..].copy_from_slice(&value.to_be_bytes());
        self.stream.write_buffer(&buf)?;
        Ok(())
    }

    fn write_text(self, size: Option<u64>) -> Result<Self::Text> {
        let stream = self.open(MAJOR_TEXT, size)?;
        Ok(CborStreamWriter::new(stream, MAJOR_TEXT, size.is_none()))
    }

    fn write_binary(self, size: Option<u64>) -> Result<Self::Binary> {
        let stream = self.open(MAJOR_BYTES, size)?;
        Ok(CborStreamWriter::new(stream, MAJOR_BYTES, size.is_none()))
    }

    fn write_array(self, size: Option<u64>) -> Result<Self::Array> {
        let stream = self.open(MAJOR_ARRAY, size)?;
        Ok(CborArrayWriter {
            stream,
            indefinite: size.is_none(),
        })
    }

    fn write_map(self, size: Option<u64>) -> Result<Self::Map> {
        let stream = self.open(MAJOR_MAP, size)?;
        Ok(CborMapWriter {
            stream,
            indefinite: size.is_none(),
        })
    }
}

/// Text or byte string payload.
///
/// For indefinite strings every `write_buffer` call becomes one chunk. Text
/// chunks must each be valid UTF-8, so a multi-byte sequence split across
/// calls is held back until its remaining bytes arrive.
pub struct CborStreamWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    major: u8,
    indefinite: bool,
    pending: [u8; 4],
    pending_len: usize,
}

impl<'s, S: WriteStream + ?Sized> CborStreamWriter<'s, S> {
    fn new(stream: &'s mut S, major: u8, indefinite: bool) -> Self {
        Self {
            stream,
            major,
            indefinite,
            pending: [0; 4],
            pending_len: 0,
        }
    }

    fn write_chunk(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        write_header(&mut *self.stream, self.major, bytes.len() as u64)?;
        self.stream.write_buffer(bytes)?;
        Ok(())
    }

    fn write_text_chunk(&mut self, mut bytes: &[u8]) -> Result<()> {
        if self.pending_len > 0 {
            let expected = utf8_sequence_len(self.pending[0]);
            let take = (expected - self.pending_len).min(bytes.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&bytes[..take]);
            self.pending_len += take;
            bytes = &bytes[take..];
            if self.pending_len < expected {
                return Ok(());
            }
            let pending = self.pending;
            self.pending_len = 0;
            self.write_chunk(&pending[..expected])?;
        }
        let complete = complete_utf8_prefix(bytes);
        self.write_chunk(&bytes[..complete])?;
        let rest = &bytes[complete..];
        self.pending[..rest.len()].copy_from_slice(rest);
        self.pending_len = rest.len();
        Ok(())
    }
}

impl<S: WriteStream + ?Sized> StreamWriter for CborStreamWriter<'_, S> {
    fn write_buffer(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.indefinite {
            self.stream.write_buffer(bytes)?;
            Ok(())
        } else if self.major == MAJOR_TEXT {
            self.write_text_chunk(bytes)
        } else {
            self.write_chunk(bytes)
        }
    }

    fn flush(mut self) -> Result<()> {
        if self.indefinite {
            if self.pending_len > 0 {
                let pending = self.pending;
                let len = self.pending_len;
                self.write_chunk(&pending[..len])?;
            }
            self.stream.write_u8(BREAK)?;
        }
        Ok(())
    }
}

fn utf8_sequence_len(lead: u8) -> usize {
    match lead {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}

/// Length of the longest prefix of `bytes` that does not end inside a
/// multi-byte UTF-8 sequence.
fn complete_utf8_prefix(bytes: &[u8]) -> usize {
    let len = bytes.len();
    for back in 1..=len.min(3) {
        let byte = bytes[len - back];
        if byte & 0xc0 != 0x80 {
            return if utf8_sequence_len(byte) > back {
                len - back
            } else {
                len
            };
        }
    }
    len
}

pub struct CborArrayWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    indefinite: bool,
}

impl<'s, S: WriteStream + ?Sized> ArrayWriter for CborArrayWriter<'s, S> {
    type Element<'a>
        = CborWriter<'a, S>
    where
        Self: 'a;

    fn append(&mut self) -> CborWriter<'_, S> {
        CborWriter::new(&mut *self.stream)
    }

    fn flush(self) -> Result<()> {
        if self.indefinite {
            self.stream.write_u8(BREAK)?;
        }
        Ok(())
    }
}

pub struct CborMapWriter<'s, S: ?Sized> {
    stream: &'s mut S,
    indefinite: bool,
}

impl<'s, S: WriteStream + ?Sized> MapWriter for CborMapWriter<'s, S> {
    type Element<'a>
        = CborWriter<'a, S>
    where
        Self: 'a;

    fn append_key(&mut self) -> CborWriter<'_, S> {
        CborWriter::new(&mut *self.stream)
    }

    fn append_value(&mut self) -> CborWriter<'_, S> {
        CborWriter::new(&mut *self.stream)
    }

    fn flush(self) -> Result<()> {
        if self.indefinite {
            self.stream.write_u8(BREAK)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(write: impl FnOnce(CborWriter<'_, Vec<u8>>) -> Result<()>) -> Vec<u8> {
        let mut out = Vec::new();
        write(CborWriter::new(&mut out)).unwrap();
        out
    }

    #[test]
    fn test_scalars() {
        assert_eq!(encode(|w| w.write_null()), [0xf6]);
        assert_eq!(encode(|w| w.write_undefined()), [0xf7]);
        assert_eq!(encode(|w| w.write_bool(false)), [0xf4]);
        assert_eq!(encode(|w| w.write_bool(true)), [0xf5]);
        assert_eq!(encode(|w| w.write_u64(500)), [0x19, 0x01, 0xf4]);
        assert_eq!(encode(|w| w.write_i64(-1)), [0x20]);
        assert_eq!(encode(|w| w.write_i64(-500)), [0x39, 0x01, 0xf3]);
        assert_eq!(encode(|w| w.write_i64(7)), [0x07]);
        assert_eq!(
            encode(|w| w.write_i64(i64::MIN)),
            [0x3b, 0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(
            encode(|w| w.write_f64(1.5)),
            [0xfb, 0x3f, 0xf8, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_sized_text_and_binary() {
        assert_eq!(encode(|w| w.write_str("abc")), [0x63, b'a', b'b', b'c']);
        assert_eq!(encode(|w| w.write_bytes(&[1, 2])), [0x42, 1, 2]);
        assert_eq!(encode(|w| w.write_str("")), [0x60]);
    }

    #[test]
    fn test_indefinite_binary_chunks() {
        let out = encode(|w| {
            let mut bin = w.write_binary(None)?;
            bin.write_buffer(&[1, 2])?;
            bin.write_buffer(&[])?;
            bin.write_buffer(&[3])?;
            bin.flush()
        });
        assert_eq!(out, [0x5f, 0x42, 1, 2, 0x41, 3, 0xff]);
    }

    #[test]
    fn test_indefinite_text_keeps_utf8_sequences_whole() {
        let euro = "€".as_bytes();
        let out = encode(|w| {
            let mut text = w.write_text(None)?;
            text.write_buffer(&[b'a', euro[0]])?;
            text.write_buffer(&euro[1..2])?;
            text.write_buffer(&[euro[2], b'b'])?;
            text.flush()
        });
        assert_eq!(
            out,
            [0x7f, 0x61, b'a', 0x63, euro[0], euro[1], euro[2], 0x61, b'b', 0xff]
        );
    }

    #[test]
    fn test_indefinite_text_flushes_truncated_sequence() {
        let out = encode(|w| {
            let mut text = w.write_text(None)?;
            text.write_buffer(&[0xe2, 0x82])?;
            text.flush()
        });
        assert_eq!(out, [0x7f, 0x62, 0xe2, 0x82, 0xff]);
    }

    #[test]
    fn test_containers() {
        let out = encode(|w| {
            let mut array = w.write_array(Some(2))?;
            array.append().write_u64(1)?;
            array.append().write_str("x")?;
            array.flush()
        });
        assert_eq!(out, [0x82, 0x01, 0x61, b'x']);

        let out = encode(|w| {
            let mut map = w.write_map(None)?;
            map.append_key().write_str("k")?;
            map.append_value().write_null()?;
            map.flush()
        });
        assert_eq!(out, [0xbf, 0x61, b'k', 0xf6, 0xff]);
    }

    #[test]
    fn test_tags() {
        let out = encode(|w| w.write_self_described()?.write_u64(0));
        assert_eq!(out, [0xd9, 0xd9, 0xf7, 0x00]);
        let out = encode(|w| w.write_tag(1)?.write_u64(0));
        assert_eq!(out, [0xc1, 0x00]);
    }

    #[test]
    fn test_complete_utf8_prefix() {
        assert_eq!(complete_utf8_prefix(b""), 0);
        assert_eq!(complete_utf8_prefix(b"abc"), 3);
        assert_eq!(complete_utf8_prefix(&[b'a', 0xe2]), 1);
        assert_eq!(complete_utf8_prefix(&[b'a', 0xe2, 0x82]), 1);
        assert_eq!(complete_utf8_prefix(&[0xe2, 0x82, 0xac]), 3);
        assert_eq!(complete_utf8_prefix(&[0xf0, 0x9f, 0x98]), 0);
    }
}
