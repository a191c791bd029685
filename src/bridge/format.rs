// In: src/bridge/format.rs

//! Collects the on-disk constants and defines the public report structs for the
//! huffpack container. Both container layouts:
//!
//! ```text
//! framed : "HUFP" | version u16 LE | header_len u32 LE | header | payload
//! legacy :                           header_len u32 LE | header | payload
//! ```

use crate::config::HeaderFormat;
use crate::types::CodeTable;

//==================================================================================
// I. Container Constants
//==================================================================================

// Each constant lives with the layer that enforces it; they are gathered here
// so callers have one place to look.
pub use crate::pipeline::container::{FILE_FORMAT_VERSION, FILE_MAGIC};
pub use crate::storage::MAX_HEADER_LEN;

//==================================================================================
// II. Header Constants
//==================================================================================

pub use crate::kernels::header::{LEGACY_TERMINATOR_BYTE, MAX_CODE_LEN, RECORD_SEPARATOR};

//==================================================================================
// III. Public Report Structs
//==================================================================================

/// Returned by a successful compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionStats {
    pub format: HeaderFormat,
    pub input_size: u64,
    /// Bytes before the payload: preamble, length prefix and header block.
    pub header_size: u64,
    pub payload_size: u64,
    pub total_size: u64,
    /// Distinct symbols in the code table, terminator included.
    pub distinct_symbols: usize,
}

impl CompressionStats {
    /// Output size divided by input size; `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_size > 0).then(|| self.total_size as f64 / self.input_size as f64)
    }
}

/// Returned by a successful decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompressionStats {
    pub format: HeaderFormat,
    pub input_size: u64,
    pub output_size: u64,
}

/// Header metadata extracted without decoding the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub format: HeaderFormat,
    /// `Some` for framed files only.
    pub format_version: Option<u16>,
    pub header_size: usize,
    pub payload_size: usize,
    pub code_table: CodeTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::compress_bytes;
    use crate::config::CodecConfig;

    #[test]
    fn test_constants_match_the_bytes_on_disk() {
        let bytes = compress_bytes(b"aab", &CodecConfig::default()).unwrap();
        assert_eq!(&bytes[..4], FILE_MAGIC);
        assert_eq!(&bytes[4..6], &FILE_FORMAT_VERSION.to_le_bytes());

        assert_eq!(FILE_MAGIC, b"HUFP");
        assert_eq!(RECORD_SEPARATOR, 0x1E);
        assert_eq!(LEGACY_TERMINATOR_BYTE, 0x03);
        assert_eq!(MAX_HEADER_LEN, 64 * 1024);
        assert_eq!(MAX_CODE_LEN, 256);
    }
}
