//! This module contains the header codec: the conversion between a `CodeTable`
//! and the byte block stored ahead of the payload.
//!
//! Two encodings exist. The framed encoding writes every entry as
//! `varint(symbol) varint(code_len) packed_code_bits` and can carry the whole
//! 257-symbol alphabet. The legacy encoding writes `symbol '0'/'1'... 0x1E`
//! records and stays byte-compatible with files written before the framed
//! container existed. Neither includes the 4-byte block length; `BitPacker`
//! and `BitReader` own that prefix.

use std::io::Cursor;

use bitvec::prelude::*;

use crate::config::HeaderFormat;
use crate::error::HuffError;
use crate::kernels::leb128;
use crate::types::{Code, CodeTable, Symbol};

/// Longest code a 257-symbol Huffman tree can assign.
pub const MAX_CODE_LEN: usize = 256;

/// ASCII record separator closing every legacy header record.
pub const RECORD_SEPARATOR: u8 = 0x1E;
/// The in-band byte the legacy format uses for the terminator symbol.
pub const LEGACY_TERMINATOR_BYTE: u8 = 0x03;

//==================================================================================
// 1. Public API
//==================================================================================

pub fn serialize(table: &CodeTable, format: HeaderFormat) -> Result<Vec<u8>, HuffError> {
    match format {
        HeaderFormat::Framed => serialize_framed(table),
        HeaderFormat::Legacy => serialize_legacy(table),
    }
}

pub fn deserialize(block: &[u8], format: HeaderFormat) -> Result<CodeTable, HuffError> {
    match format {
        HeaderFormat::Framed => deserialize_framed(block),
        HeaderFormat::Legacy => deserialize_legacy(block),
    }
}

//==================================================================================
// 2. Framed Encoding
//==================================================================================

fn serialize_framed(table: &CodeTable) -> Result<Vec<u8>, HuffError> {
    let mut out = Vec::with_capacity(table.len() * 4);
    leb128::encode_one(table.len() as u32, &mut out)?;

    for (symbol, code) in table {
        leb128::encode_one(symbol.index(), &mut out)?;
        leb128::encode_one(code.len() as u32, &mut out)?;

        let mut packed = vec![0u8; code.len().div_ceil(8)];
        packed.view_bits_mut::<Msb0>()[..code.len()].copy_from_bitslice(code);
        out.extend_from_slice(&packed);
    }
    Ok(out)
}

fn deserialize_framed(block: &[u8]) -> Result<CodeTable, HuffError> {
    let mut cursor = Cursor::new(block);
    let count = leb128::decode_one::<u32>(&mut cursor)? as usize;
    if count == 0 || count > Symbol::COUNT {
        return Err(HuffError::FormatError(format!(
            "header declares {count} entries; expected 1 to {}",
            Symbol::COUNT
        )));
    }

    let mut table = CodeTable::new();
    for _ in 0..count {
        let index = leb128::decode_one::<u16>(&mut cursor)?;
        let symbol = Symbol::from_index(index).ok_or_else(|| {
            HuffError::FormatError(format!("symbol index {index} is outside the alphabet"))
        })?;

        let code_len = leb128::decode_one::<u32>(&mut cursor)? as usize;
        if code_len == 0 || code_len > MAX_CODE_LEN {
            return Err(HuffError::FormatError(format!(
                "symbol {symbol} has code length {code_len}; expected 1 to {MAX_CODE_LEN}"
            )));
        }

        let start = cursor.position() as usize;
        let end = start + code_len.div_ceil(8);
        let packed = block.get(start..end).ok_or_else(|| {
            HuffError::FormatError(format!("code bits for {symbol} run past end of header"))
        })?;
        cursor.set_position(end as u64);

        let bits = packed.view_bits::<Msb0>();
        if bits[code_len..].any() {
            return Err(HuffError::FormatError(format!(
                "code for {symbol} has nonzero padding bits"
            )));
        }

        if table.insert(symbol, Code::from_bitslice(&bits[..code_len])).is_some() {
            return Err(HuffError::FormatError(format!(
                "symbol {symbol} appears twice in the header"
            )));
        }
    }

    if cursor.position() as usize != block.len() {
        return Err(HuffError::FormatError(format!(
            "{} trailing bytes after the last header entry",
            block.len() - cursor.position() as usize
        )));
    }
    Ok(table)
}

//==================================================================================
// 3. Legacy Encoding
//==================================================================================

fn legacy_symbol_byte(symbol: Symbol) -> Result<u8, HuffError> {
    match symbol {
        Symbol::Byte(b) if b == LEGACY_TERMINATOR_BYTE || b == RECORD_SEPARATOR => {
            Err(HuffError::ReservedByte(b))
        }
        Symbol::Byte(b) => Ok(b),
        Symbol::Terminator => Ok(LEGACY_TERMINATOR_BYTE),
    }
}

fn serialize_legacy(table: &CodeTable) -> Result<Vec<u8>, HuffError> {
    let mut out = Vec::with_capacity(table.values().map(|c| c.len() + 2).sum());
    for (&symbol, code) in table {
        out.push(legacy_symbol_byte(symbol)?);
        out.extend(code.iter().by_vals().map(|bit| if bit { b'1' } else { b'0' }));
        out.push(RECORD_SEPARATOR);
    }
    Ok(out)
}

/// Scans for each separator in turn: the first byte of a record is the symbol,
/// the bytes between it and the separator are the code characters.
///
/// A symbol byte equal to the separator cannot be told apart from the end of a
/// record; such headers are rejected as empty records rather than misparsed.
fn deserialize_legacy(block: &[u8]) -> Result<CodeTable, HuffError> {
    let mut table = CodeTable::new();
    let mut rest = block;

    while let Some(sep) = rest.iter().position(|&b| b == RECORD_SEPARATOR) {
        let Some((&symbol_byte, chars)) = rest[..sep].split_first() else {
            return Err(HuffError::FormatError(
                "empty record before separator".to_string(),
            ));
        };
        let symbol = if symbol_byte == LEGACY_TERMINATOR_BYTE {
            Symbol::Terminator
        } else {
            Symbol::Byte(symbol_byte)
        };

        let mut code = Code::with_capacity(chars.len());
        for &c in chars {
            match c {
                b'0' => code.push(false),
                b'1' => code.push(true),
                other => {
                    return Err(HuffError::FormatError(format!(
                        "code for {symbol} contains {other:#04x}; expected '0' or '1'"
                    )));
                }
            }
        }

        if table.insert(symbol, code).is_some() {
            return Err(HuffError::FormatError(format!(
                "symbol {symbol} appears twice in the header"
            )));
        }
        rest = &rest[sep + 1..];
    }

    if !rest.is_empty() {
        return Err(HuffError::FormatError(format!(
            "header ends inside a record ({} bytes without a separator)",
            rest.len()
        )));
    }
    Ok(table)
}
