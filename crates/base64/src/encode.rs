//! Standard base64 encoding, one-shot and incremental.

use crate::constants::{ALPHABET_BYTES, PAD};

/// Incremental base64 encoder.
///
/// Input may arrive in chunks of any size; bytes that do not complete a
/// 3-byte group are carried into the next [`update`](Self::update) call and
/// padded by [`finish`](Self::finish).
///
/// # Example
///
/// ```
/// use docstream_base64::Base64Encoder;
///
/// let mut out = Vec::new();
/// let mut encoder = Base64Encoder::new();
/// encoder.update(b"Hello ", &mut out);
/// encoder.update(b"world!", &mut out);
/// encoder.finish(&mut out);
/// assert_eq!(out, b"SGVsbG8gd29ybGQh");
/// ```
#[derive(Debug, Default, Clone)]
pub struct Base64Encoder {
    carry: [u8; 2],
    carry_len: usize,
}

impl Base64Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of input bytes held back waiting for a complete group.
    pub fn pending(&self) -> usize {
        self.carry_len
    }

    /// Encodes `input`, appending every complete quartet to `out`.
    pub fn update(&mut self, mut input: &[u8], out: &mut Vec<u8>) {
        out.reserve((self.carry_len + input.len()) / 3 * 4);
        if self.carry_len > 0 {
            let need = 3 - self.carry_len;
            if input.len() < need {
                self.carry[self.carry_len..self.carry_len + input.len()].copy_from_slice(input);
                self.carry_len += input.len();
                return;
            }
            let mut group = [0u8; 3];
            group[..self.carry_len].copy_from_slice(&self.carry[..self.carry_len]);
            group[self.carry_len..].copy_from_slice(&input[..need]);
            push_group(&group, out);
            input = &input[need..];
            self.carry_len = 0;
        }
        let mut groups = input.chunks_exact(3);
        for group in &mut groups {
            push_group(group, out);
        }
        let rest = groups.remainder();
        self.carry[..rest.len()].copy_from_slice(rest);
        self.carry_len = rest.len();
    }

    /// Encodes the carried bytes with padding. The encoder is empty afterwards.
    pub fn finish(&mut self, out: &mut Vec<u8>) {
        match self.carry_len {
            1 => {
                let o1 = self.carry[0];
                out.push(ALPHABET_BYTES[(o1 >> 2) as usize]);
                out.push(ALPHABET_BYTES[((o1 & 0b11) << 4) as usize]);
                out.push(PAD);
                out.push(PAD);
            }
            2 => {
                let o1 = self.carry[0];
                let o2 = self.carry[1];
                out.push(ALPHABET_BYTES[(o1 >> 2) as usize]);
                out.push(ALPHABET_BYTES[(((o1 & 0b11) << 4) | (o2 >> 4)) as usize]);
                out.push(ALPHABET_BYTES[((o2 & 0b1111) << 2) as usize]);
                out.push(PAD);
            }
            _ => {}
        }
        self.carry_len = 0;
    }
}

#[inline]
fn push_group(group: &[u8], out: &mut Vec<u8>) {
    let (o1, o2, o3) = (group[0], group[1], group[2]);
    out.push(ALPHABET_BYTES[(o1 >> 2) as usize]);
    out.push(ALPHABET_BYTES[(((o1 & 0b11) << 4) | (o2 >> 4)) as usize]);
    out.push(ALPHABET_BYTES[(((o2 & 0b1111) << 2) | (o3 >> 6)) as usize]);
    out.push(ALPHABET_BYTES[(o3 & 0b111111) as usize]);
}

/// Encodes a byte slice to a standard base64 string.
///
/// # Example
///
/// ```
/// use docstream_base64::to_base64;
///
/// let encoded = to_base64(b"hello world");
/// assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
/// ```
pub fn to_base64(uint8: &[u8]) -> String {
    let mut out = Vec::with_capacity((uint8.len() + 2) / 3 * 4);
    let mut encoder = Base64Encoder::new();
    encoder.update(uint8, &mut out);
    encoder.finish(&mut out);
    // The alphabet and padding are ASCII.
    out.into_iter().map(char::from).collect()
}
