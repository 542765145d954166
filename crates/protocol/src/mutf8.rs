//! Modified UTF-8 codec
//!
//! Strings on the wire are UTF-16 code units packed the way `DataOutput.writeUTF`
//! packs them, so existing receivers can read our frames:
//!
//! ```text
//! 0x0001..=0x007F  -> 0xxxxxxx
//! 0x0800..=0xFFFF  -> 1110xxxx 10xxxxxx 10xxxxxx
//! everything else  -> 110xxxxx 10xxxxxx          (includes 0x0000)
//! ```
//!
//! Characters outside the BMP travel as two 3-byte surrogates.

use crate::{ProtocolError, Result};

/// Largest body a 2-byte length prefix can describe
pub const MAX_ENCODED_LEN: usize = u16::MAX as usize;

/// Number of bytes `s` occupies once encoded (without the length prefix)
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

#[inline]
fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0800..=0xFFFF => 3,
        _ => 2,
    }
}

/// Encode `s` into the front of `out`, returning the number of bytes written.
///
/// `out` must hold at least `encoded_len(s)` bytes.
pub fn encode_into(s: &str, out: &mut [u8]) -> usize {
    let mut i = 0;
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => {
                out[i] = unit as u8;
                i += 1;
            }
            0x0800..=0xFFFF => {
                out[i] = (0xE0 | ((unit >> 12) & 0x0F)) as u8;
                out[i + 1] = (0x80 | ((unit >> 6) & 0x3F)) as u8;
                out[i + 2] = (0x80 | (unit & 0x3F)) as u8;
                i += 3;
            }
            _ => {
                out[i] = (0xC0 | ((unit >> 6) & 0x1F)) as u8;
                out[i + 1] = (0x80 | (unit & 0x3F)) as u8;
                i += 2;
            }
        }
    }
    i
}

/// Encode `s` into a new vector
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = vec![0u8; encoded_len(s)];
    encode_into(s, &mut out);
    out
}

/// Decode a modified UTF-8 body (length prefix already stripped)
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b >> 4 {
            0..=7 => {
                units.push(u16::from(b));
                i += 1;
            }
            12 | 13 => {
                let b2 = continuation(bytes, i, 1)?;
                units.push((u16::from(b & 0x1F) << 6) | u16::from(b2 & 0x3F));
                i += 2;
            }
            14 => {
                let b2 = continuation(bytes, i, 1)?;
                let b3 = continuation(bytes, i, 2)?;
                units.push(
                    (u16::from(b & 0x0F) << 12)
                        | (u16::from(b2 & 0x3F) << 6)
                        | u16::from(b3 & 0x3F),
                );
                i += 3;
            }
            _ => return Err(ProtocolError::MalformedUtf { offset: i }),
        }
    }

    String::from_utf16(&units).map_err(|_| ProtocolError::InvalidUtf16)
}

#[inline]
fn continuation(bytes: &[u8], start: usize, index: usize) -> Result<u8> {
    match bytes.get(start + index) {
        Some(&b) if b & 0xC0 == 0x80 => Ok(b),
        _ => Err(ProtocolError::MalformedUtf { offset: start }),
    }
}

#[cfg(test)]
#[path = "mutf8_test.rs"]
mod mutf8_test;
