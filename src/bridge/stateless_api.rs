// In: src/bridge/stateless_api.rs

use crate::bridge::format::{CompressionStats, HeaderInfo};
use crate::config::CodecConfig;
use crate::error::HuffError;
use crate::kernels::header;
use crate::pipeline::{self, container, MemorySource};
use crate::storage::BitReader;

/// Compresses an in-memory buffer into a complete huffpack container.
/// `config.input_strategy` is irrelevant here: the data is already in memory.
pub fn compress_bytes(data: &[u8], config: &CodecConfig) -> Result<Vec<u8>, HuffError> {
    compress_bytes_with_stats(data, config).map(|(bytes, _)| bytes)
}

/// As [`compress_bytes`], also returning the size breakdown.
pub fn compress_bytes_with_stats(
    data: &[u8],
    config: &CodecConfig,
) -> Result<(Vec<u8>, CompressionStats), HuffError> {
    config.validate()?;
    let sink = Vec::with_capacity(data.len() / 2 + 64);
    let (bytes, summary) =
        pipeline::encode(&mut MemorySource::new(data), sink, config.header_format)?;

    let stats = CompressionStats {
        format: config.header_format,
        input_size: summary.input_bytes,
        header_size: summary.header_bytes,
        payload_size: summary.payload_bytes,
        total_size: bytes.len() as u64,
        distinct_symbols: summary.distinct_symbols,
    };
    Ok((bytes, stats))
}

/// Decompresses a complete container held in memory. The format is detected
/// from the bytes themselves.
pub fn decompress_bytes(bytes: &[u8]) -> Result<Vec<u8>, HuffError> {
    let (out, _) = pipeline::decode(bytes, Vec::with_capacity(bytes.len() * 2))?;
    Ok(out)
}

/// Parses the container header and code table without decoding the payload.
pub fn inspect(bytes: &[u8]) -> Result<HeaderInfo, HuffError> {
    let mut reader = BitReader::new(bytes);
    let container = container::read_container_header(&mut reader)?;
    let code_table = header::deserialize(&container.block, container.format)?;

    Ok(HeaderInfo {
        format: container.format,
        format_version: container.version,
        header_size: container.size,
        payload_size: bytes.len() - container.size,
        code_table,
    })
}
