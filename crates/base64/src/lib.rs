//! Standard padded base64 for docstream.
//!
//! [`to_base64`] and [`from_base64`] work on whole slices. [`Base64Encoder`]
//! accepts its input in arbitrary chunks, which is how binary payloads are
//! streamed into JSON text.
//!
//! # Example
//!
//! ```
//! use docstream_base64::{from_base64, to_base64};
//!
//! let encoded = to_base64(b"Hello world!");
//! assert_eq!(encoded, "SGVsbG8gd29ybGQh");
//! assert_eq!(from_base64(&encoded).unwrap(), b"Hello world!");
//! ```

mod constants;
mod decode;
mod encode;

pub use constants::{ALPHABET, ALPHABET_BYTES, PAD};
pub use decode::from_base64;
pub use encode::{to_base64, Base64Encoder};

/// Reasons [`from_base64`] rejects its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Base64Error {
    /// Byte at this offset is outside the alphabet, or is padding before the
    /// final quartet.
    InvalidCharacter(usize),
    /// Input length is not a multiple of four.
    InvalidLength(usize),
}

impl std::fmt::Display for Base64Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Base64Error::InvalidCharacter(offset) => {
                write!(f, "invalid base64 character at offset {offset}")
            }
            Base64Error::InvalidLength(len) => {
                write!(f, "base64 length {len} is not a multiple of 4")
            }
        }
    }
}

impl std::error::Error for Base64Error {}
