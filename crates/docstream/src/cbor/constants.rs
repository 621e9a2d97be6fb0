// CBOR major types and additional-information values (RFC 8949).
pub const MAJOR_UNSIGNED: u8 = 0;
pub const MAJOR_NEGATIVE: u8 = 1;
pub const MAJOR_BYTES: u8 = 2;
pub const MAJOR_TEXT: u8 = 3;
pub const MAJOR_ARRAY: u8 = 4;
pub const MAJOR_MAP: u8 = 5;
pub const MAJOR_TAG: u8 = 6;
pub const MAJOR_SIMPLE: u8 = 7;

pub const INFO_U8: u8 = 24;
pub const INFO_U16: u8 = 25;
pub const INFO_U32: u8 = 26;
pub const INFO_U64: u8 = 27;
pub const INFO_INDEFINITE: u8 = 31;

pub const SIMPLE_FALSE: u8 = 20;
pub const SIMPLE_TRUE: u8 = 21;
pub const SIMPLE_NULL: u8 = 22;
pub const SIMPLE_UNDEFINED: u8 = 23;
pub const SIMPLE_FLOAT16: u8 = 25;
pub const SIMPLE_FLOAT32: u8 = 26;
pub const SIMPLE_FLOAT64: u8 = 27;

pub const BREAK: u8 = 0xff;

/// Tag marking the data item that follows as CBOR.
pub const SELF_DESCRIBE_TAG: u64 = 55799;

#[inline]
pub const fn initial_byte(major: u8, info: u8) -> u8 {
    (major << 5) | info
}
