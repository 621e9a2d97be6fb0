//! Standard base64 decoding.

use crate::constants::{DECODE_TABLE, PAD};
use crate::Base64Error;

/// Decodes a padded standard base64 string.
///
/// # Example
///
/// ```
/// use docstream_base64::from_base64;
///
/// assert_eq!(from_base64("aGVsbG8=").unwrap(), b"hello");
/// ```
pub fn from_base64(encoded: &str) -> Result<Vec<u8>, Base64Error> {
    let bytes = encoded.as_bytes();
    if bytes.len() % 4 != 0 {
        return Err(Base64Error::InvalidLength(bytes.len()));
    }
    let mut out = Vec::with_capacity(bytes.len() / 4 * 3);
    let quartets = bytes.len() / 4;
    for (index, quartet) in bytes.chunks_exact(4).enumerate() {
        let last = index + 1 == quartets;
        let padding = match (quartet[2], quartet[3]) {
            (PAD, PAD) if last => 2,
            (_, PAD) if last => 1,
            _ => 0,
        };
        let mut sextets = [0u8; 4];
        for (i, &b) in quartet[..4 - padding].iter().enumerate() {
            let sextet = DECODE_TABLE[b as usize];
            if sextet < 0 {
                return Err(Base64Error::InvalidCharacter(index * 4 + i));
            }
            sextets[i] = sextet as u8;
        }
        out.push((sextets[0] << 2) | (sextets[1] >> 4));
        if padding < 2 {
            out.push((sextets[1] << 4) | (sextets[2] >> 2));
        }
        if padding < 1 {
            out.push((sextets[2] << 6) | sextets[3]);
        }
    }
    Ok(out)
}
