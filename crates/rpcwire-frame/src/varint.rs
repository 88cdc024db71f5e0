//! Unsigned LEB128 varints, as used for frame lengths and header fields.
//!
//! Seven value bits per byte, least significant group first, high bit set on
//! every byte except the last. A `u64` needs at most [`MAX_VARINT_LEN`] bytes.

use bytes::BufMut;

use crate::error::{FrameError, Result};

/// Maximum encoded length of a `u64` varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Append `value` to `dst`, returning the number of bytes written.
pub fn put_uvarint<B: BufMut>(dst: &mut B, mut value: u64) -> usize {
    let mut written = 1;
    while value >= 0x80 {
        dst.put_u8((value as u8) | 0x80);
        value >>= 7;
        written += 1;
    }
    dst.put_u8(value as u8);
    written
}

/// Number of bytes `put_uvarint` would write for `value`.
pub fn uvarint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `src`.
///
/// Returns `Ok(None)` if `src` ends before the terminating byte, otherwise the
/// value and the number of bytes it occupied.
pub fn decode_uvarint(src: &[u8]) -> Result<Option<(u64, usize)>> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (index, &byte) in src.iter().enumerate() {
        if index == MAX_VARINT_LEN {
            return Err(FrameError::VarintOverflow);
        }
        if byte < 0x80 {
            // The tenth byte may only carry the single remaining bit.
            if index == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(FrameError::VarintOverflow);
            }
            return Ok(Some((value | (u64::from(byte) << shift), index + 1)));
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    if src.len() >= MAX_VARINT_LEN {
        return Err(FrameError::VarintOverflow);
    }
    Ok(None)
}
