//! This module contains the frequency analysis kernel: a single scan over an
//! input stream that counts every byte value and seeds the terminator symbol.

use std::io::{ErrorKind, Read};

use crate::error::HuffError;
use crate::types::{FrequencyTable, Symbol};

const SCAN_CHUNK: usize = 8 * 1024;

//==================================================================================
// 1. Core Logic
//==================================================================================

fn count_into(bytes: &[u8], counts: &mut [u64; 256]) {
    for &b in bytes {
        counts[b as usize] += 1;
    }
}

/// Turns a dense histogram into a table holding only the symbols that occurred,
/// plus the terminator with a count of exactly 1.
fn finish(counts: &[u64; 256], total_bytes: u64) -> FrequencyTable {
    let mut table = FrequencyTable::new();
    for (byte, &count) in counts.iter().enumerate() {
        if count > 0 {
            table.insert(Symbol::Byte(byte as u8), count);
        }
    }
    table.insert(Symbol::Terminator, 1);
    table.set_total_bytes(total_bytes);
    table
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Scans `reader` to exhaustion and returns its frequency table.
pub fn analyze<R: Read>(mut reader: R) -> Result<FrequencyTable, HuffError> {
    let mut counts = [0u64; 256];
    let mut total_bytes = 0u64;
    let mut chunk = [0u8; SCAN_CHUNK];

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        count_into(&chunk[..n], &mut counts);
        total_bytes += n as u64;
    }

    Ok(finish(&counts, total_bytes))
}

/// Infallible variant for data already in memory.
pub fn analyze_slice(bytes: &[u8]) -> FrequencyTable {
    let mut counts = [0u64; 256];
    count_into(bytes, &mut counts);
    finish(&counts, bytes.len() as u64)
}
