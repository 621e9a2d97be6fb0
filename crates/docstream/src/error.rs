//! Error type shared by every reader and writer.

use docstream_buffers::BufferError;
use thiserror::Error;

/// Data and stream errors.
///
/// Misuse of the streaming API (writing the wrong number of elements,
/// skipping a child handle) is not reported here: the debug-check
/// decorator panics on it instead.
#[derive(Debug, Error)]
pub enum Error {
    /// The input does not follow the format's grammar.
    #[error("malformed input: {0}")]
    Malformed(&'static str),
    /// The target format has no representation for the value.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
    /// The byte stream failed.
    #[error(transparent)]
    Stream(BufferError),
}

impl From<BufferError> for Error {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => Error::Malformed("unexpected end of input"),
            err => Error::Stream(err),
        }
    }
}

impl Error {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
