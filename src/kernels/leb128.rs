//! This module contains the unsigned LEB128 (Little-Endian Base 128) varint
//! kernels used by the framed header to store entry counts, symbol indices
//! and code lengths.
//!
//! Small values, which is nearly all of them here, take a single byte. The
//! decoder is panic-free and treats every malformed sequence as a format error.

use std::io::Cursor;

use num_traits::{PrimInt, Unsigned};

use crate::error::HuffError;

/// Appends the LEB128 encoding of `value` to `buffer`.
pub fn encode_one<T>(value: T, buffer: &mut Vec<u8>) -> Result<(), HuffError>
where
    T: PrimInt + Unsigned,
{
    let low_bits = T::from(0x7F)
        .ok_or_else(|| HuffError::InternalError("7-bit mask does not fit the type".to_string()))?;

    let mut remaining = value;
    loop {
        let group = (remaining & low_bits)
            .to_u8()
            .ok_or_else(|| HuffError::InternalError("7-bit group exceeds u8".to_string()))?;
        remaining = remaining >> 7;
        if remaining.is_zero() {
            buffer.push(group);
            return Ok(());
        }
        buffer.push(group | 0x80);
    }
}

/// Decodes one value starting at the cursor's position and advances past it.
pub fn decode_one<T>(cursor: &mut Cursor<&[u8]>) -> Result<T, HuffError>
where
    T: PrimInt + Unsigned,
{
    let total_bits = std::mem::size_of::<T>() * 8;
    let mut result = T::zero();
    let mut shift = 0usize;

    loop {
        let pos = cursor.position() as usize;
        let byte = *cursor
            .get_ref()
            .get(pos)
            .ok_or_else(|| HuffError::FormatError("varint runs past end of header".to_string()))?;
        cursor.set_position((pos + 1) as u64);

        if shift >= total_bits {
            return Err(HuffError::FormatError("varint overflows its type".to_string()));
        }
        let payload = byte & 0x7F;
        // Bits that would be shifted out of `T` must be zero.
        if shift + 7 > total_bits && (payload >> (total_bits - shift)) != 0 {
            return Err(HuffError::FormatError("varint overflows its type".to_string()));
        }
        let group = T::from(payload)
            .ok_or_else(|| HuffError::InternalError("7-bit group does not fit the type".to_string()))?;
        result = result | (group << shift);

        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
}
