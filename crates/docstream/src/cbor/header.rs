//! Initial-byte plus argument encoding shared by every CBOR data item.

use docstream_buffers::{ReadStream, WriteStream};

use super::constants::*;
use crate::error::{Error, Result};

/// Encodes the shortest header for `major` carrying `value`.
/// Returns the buffer and the number of bytes used.
pub fn encode_header(major: u8, value: u64) -> ([u8; 9], usize) {
    let mut buf = [0u8; 9];
    let len = if value <= 23 {
        buf[0] = initial_byte(major, value as u8);
        1
    } else if value <= 0xff {
        buf[0] = initial_byte(major, INFO_U8);
        buf[1] = value as u8;
        2
    } else if value <= 0xffff {
        buf[0] = initial_byte(major, INFO_U16);
        buf[1..3].copy_from_slice(&(value as u16).to_be_bytes());
        3
    } else if value <= 0xffff_ffff {
        buf[0] = initial_byte(major, INFO_U32);
        buf[1..5].copy_from_slice(&(value as u32).to_be_bytes());
        5
    } else {
        buf[0] = initial_byte(major, INFO_U64);
        buf[1..9].copy_from_slice(&value.to_be_bytes());
        9
    };
    (buf, len)
}

pub fn write_header<S: WriteStream + ?Sized>(stream: &mut S, major: u8, value: u64) -> Result<()> {
    let (buf, len) = encode_header(major, value);
    stream.write_buffer(&buf[..len])?;
    Ok(())
}

pub fn write_indefinite_header<S: WriteStream + ?Sized>(stream: &mut S, major: u8) -> Result<()> {
    stream.write_u8(initial_byte(major, INFO_INDEFINITE))?;
    Ok(())
}

pub fn read_byte<S: ReadStream + ?Sized>(stream: &mut S) -> Result<u8> {
    stream
        .read_u8()?
        .ok_or(Error::Malformed("unexpected end of input"))
}

/// Reads the argument announced by the low five bits of an initial byte.
pub fn read_argument<S: ReadStream + ?Sized>(stream: &mut S, info: u8) -> Result<u64> {
    Ok(match info {
        0..=23 => u64::from(info),
        INFO_U8 => u64::from(read_byte(stream)?),
        INFO_U16 => {
            let mut buf = [0u8; 2];
            stream.read_exact(&mut buf)?;
            u64::from(u16::from_be_bytes(buf))
        }
        INFO_U32 => {
            let mut buf = [0u8; 4];
            stream.read_exact(&mut buf)?;
            u64::from(u32::from_be_bytes(buf))
        }
        INFO_U64 => {
            let mut buf = [0u8; 8];
            stream.read_exact(&mut buf)?;
            u64::from_be_bytes(buf)
        }
        INFO_INDEFINITE => return Err(Error::Malformed("unexpected indefinite length")),
        _ => return Err(Error::Malformed("reserved additional information")),
    })
}

/// Like [`read_argument`], mapping info 31 to `None`.
pub fn read_length<S: ReadStream + ?Sized>(stream: &mut S, info: u8) -> Result<Option<u64>> {
    if info == INFO_INDEFINITE {
        Ok(None)
    } else {
        read_argument(stream, info).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstream_buffers::Reader;

    fn header(value: u64) -> Vec<u8> {
        let (buf, len) = encode_header(MAJOR_UNSIGNED, value);
        buf[..len].to_vec()
    }

    #[test]
    fn test_header_width_boundaries() {
        assert_eq!(header(0), [0x00]);
        assert_eq!(header(23), [0x17]);
        assert_eq!(header(24), [0x18, 24]);
        assert_eq!(header(255), [0x18, 0xff]);
        assert_eq!(header(256), [0x19, 0x01, 0x00]);
        assert_eq!(header(65535), [0x19, 0xff, 0xff]);
        assert_eq!(header(65536), [0x1a, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(header(u32::MAX as u64), [0x1a, 0xff, 0xff, 0xff, 0xff]);
        assert_eq!(
            header(u32::MAX as u64 + 1),
            [0x1b, 0, 0, 0, 0x01, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_major_type_is_in_high_bits() {
        let (buf, len) = encode_header(MAJOR_MAP, 3);
        assert_eq!(&buf[..len], [0xa3]);
        let (buf, len) = encode_header(MAJOR_TEXT, 100);
        assert_eq!(&buf[..len], [0x78, 100]);
    }

    #[test]
    fn test_read_argument_widths() {
        for value in [0u64, 23, 24, 255, 256, 65535, 65536, 1 << 32, u64::MAX] {
            let bytes = header(value);
            let mut reader = Reader::new(&bytes[1..]);
            assert_eq!(read_argument(&mut reader, bytes[0] & 0x1f).unwrap(), value);
            assert!(reader.remaining().is_empty());
        }
    }

    #[test]
    fn test_read_argument_rejects_reserved_info() {
        let mut reader = Reader::new(b"");
        for info in 28..=30 {
            assert!(read_argument(&mut reader, info).unwrap_err().is_malformed());
        }
        assert_eq!(read_length(&mut reader, INFO_INDEFINITE).unwrap(), None);
    }

    #[test]
    fn test_read_argument_truncated() {
        let mut reader = Reader::new(&[0x01]);
        assert!(read_argument(&mut reader, INFO_U16).unwrap_err().is_malformed());
    }
}
