//! The compression orchestrator.
//!
//! First pass: count symbols, build the tree, derive the code table. Then write
//! the container preamble and header, and make a second pass that maps every
//! input byte to its code. The terminator's code closes the payload.

use std::io::{self, ErrorKind, Read, Write};

use crate::config::HeaderFormat;
use crate::error::HuffError;
use crate::kernels::header::{LEGACY_TERMINATOR_BYTE, RECORD_SEPARATOR};
use crate::kernels::{frequency, header, tree};
use crate::pipeline::container;
use crate::storage::BitPacker;
use crate::traits::ByteSource;
use crate::types::{Code, CodeTable, FrequencyTable, Symbol};

const ENCODE_CHUNK: usize = 8 * 1024;

/// Totals gathered while encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input_bytes: u64,
    pub header_bytes: u64,
    pub payload_bytes: u64,
    pub payload_bits: u64,
    pub distinct_symbols: usize,
}

/// Dense byte -> code lookup built from a code table.
struct ByteCodes<'a> {
    codes: Vec<Option<&'a Code>>,
    terminator: &'a Code,
}

impl<'a> ByteCodes<'a> {
    fn new(table: &'a CodeTable) -> Result<Self, HuffError> {
        let mut codes = vec![None; 256];
        let mut terminator = None;
        for (symbol, code) in table {
            match symbol {
                Symbol::Byte(b) => codes[*b as usize] = Some(code),
                Symbol::Terminator => terminator = Some(code),
            }
        }
        let terminator = terminator.ok_or_else(|| {
            HuffError::InternalError("code table has no terminator entry".to_string())
        })?;
        Ok(Self { codes, terminator })
    }

    fn get(&self, byte: u8) -> Result<&'a Code, HuffError> {
        self.codes[byte as usize].ok_or_else(|| {
            HuffError::Io(io::Error::new(
                ErrorKind::InvalidData,
                format!("byte {byte:#04x} appeared on the second pass only; the input changed while being compressed"),
            ))
        })
    }
}

/// The legacy header cannot represent the bytes it uses for framing.
fn check_legacy_alphabet(frequencies: &FrequencyTable) -> Result<(), HuffError> {
    for reserved in [LEGACY_TERMINATOR_BYTE, RECORD_SEPARATOR] {
        if frequencies.get(Symbol::Byte(reserved)).is_some() {
            return Err(HuffError::ReservedByte(reserved));
        }
    }
    Ok(())
}

/// Compresses everything `source` yields into `sink` and returns the sink once
/// the payload is flushed.
pub fn encode<S, W>(source: &mut S, mut sink: W, format: HeaderFormat) -> Result<(W, EncodeSummary), HuffError>
where
    S: ByteSource,
    W: Write,
{
    // 1. First pass: frequency analysis.
    let frequencies = frequency::analyze(source.open_pass()?)?;
    log::debug!(
        "first pass over {}: {} bytes, {} distinct symbols",
        source.describe(),
        frequencies.total_bytes(),
        frequencies.len()
    );
    if format == HeaderFormat::Legacy {
        check_legacy_alphabet(&frequencies)?;
    }

    // 2. Tree and code table.
    let code_tree = tree::build_tree(&frequencies)?;
    let code_table = tree::generate_codes(&code_tree)?;
    let header_block = header::serialize(&code_table, format)?;
    log_metric!(
        "event" = "encode",
        "stage" = "code_table",
        "format" = format!("{:?}", format),
        "symbols" = code_table.len(),
        "max_code_len" = code_table.values().map(|c| c.len()).max().unwrap_or(0),
        "header_bytes" = header_block.len(),
    );

    // 3. Container preamble and header.
    let preamble_bytes = container::write_preamble(&mut sink, format)?;
    let mut packer = BitPacker::new(sink);
    packer.set_header(&header_block)?;

    // 4. Second pass: emit codes.
    let lookup = ByteCodes::new(&code_table)?;
    let mut reader = source.open_pass()?;
    let mut chunk = vec![0u8; ENCODE_CHUNK];
    let mut second_pass_bytes = 0u64;
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &chunk[..n] {
            packer.insert(lookup.get(byte)?)?;
        }
        second_pass_bytes += n as u64;
    }
    if second_pass_bytes != frequencies.total_bytes() {
        return Err(HuffError::Io(io::Error::new(
            ErrorKind::InvalidData,
            format!(
                "first pass read {} bytes but second pass read {}; the input changed while being compressed",
                frequencies.total_bytes(),
                second_pass_bytes
            ),
        )));
    }

    packer.insert(lookup.terminator)?;
    let (sink, packed) = packer.close()?;

    let summary = EncodeSummary {
        input_bytes: second_pass_bytes,
        header_bytes: (preamble_bytes + 4 + header_block.len()) as u64,
        payload_bytes: packed.payload_bytes,
        payload_bits: packed.payload_bits,
        distinct_symbols: code_table.len(),
    };
    log_metric!(
        "event" = "encode",
        "stage" = "done",
        "input_bytes" = summary.input_bytes,
        "payload_bits" = summary.payload_bits,
        "payload_bytes" = summary.payload_bytes,
    );
    Ok((sink, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::source::MemorySource;

    #[test]
    fn test_aab_framed_exact_file() {
        let (out, summary) =
            encode(&mut MemorySource::new(b"aab"), Vec::new(), HeaderFormat::Framed).unwrap();

        let mut expected = b"HUFP".to_vec();
        expected.extend_from_slice(&1u16.to_le_bytes());
        expected.extend_from_slice(&11u32.to_le_bytes());
        expected.extend_from_slice(&[0x03, 0x61, 0x01, 0x00, 0x62, 0x02, 0x80, 0x80, 0x02, 0x02, 0xC0]);
        // a a b <EOF> = 0 0 10 11 -> 00101100
        expected.push(0x2C);
        assert_eq!(out, expected);

        assert_eq!(summary.input_bytes, 3);
        assert_eq!(summary.header_bytes, 21);
        assert_eq!(summary.payload_bits, 6);
        assert_eq!(summary.payload_bytes, 1);
        assert_eq!(summary.distinct_symbols, 3);
    }

    #[test]
    fn test_aab_legacy_exact_file() {
        let (out, _) =
            encode(&mut MemorySource::new(b"aab"), Vec::new(), HeaderFormat::Legacy).unwrap();

        let mut expected = 11u32.to_le_bytes().to_vec();
        expected.extend_from_slice(&[b'a', b'0', 0x1E, b'b', b'1', b'0', 0x1E, 0x03, b'1', b'1', 0x1E]);
        expected.push(0x2C);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_empty_input_holds_only_terminator_code() {
        let (out, summary) =
            encode(&mut MemorySource::new(b""), Vec::new(), HeaderFormat::Framed).unwrap();
        // header: 1 entry, <EOF> (0x80 0x02), length 1, bits "0"
        let header = [0x01, 0x80, 0x02, 0x01, 0x00];
        assert_eq!(&out[10..15], &header);
        assert_eq!(out.len(), 16);
        assert_eq!(*out.last().unwrap(), 0x00);
        assert_eq!(summary.payload_bits, 1);
    }

    #[test]
    fn test_legacy_refuses_reserved_input_bytes() {
        for reserved in [0x03u8, 0x1E] {
            let data = [b'o', b'k', reserved];
            let result = encode(&mut MemorySource::new(&data), Vec::new(), HeaderFormat::Legacy);
            assert!(matches!(result, Err(HuffError::ReservedByte(b)) if b == reserved));
        }
    }

    /// Yields different content on each pass.
    struct ShiftingSource {
        passes: u32,
    }

    impl ByteSource for ShiftingSource {
        type Reader = io::Cursor<Vec<u8>>;

        fn open_pass(&mut self) -> Result<Self::Reader, HuffError> {
            self.passes += 1;
            let data = if self.passes == 1 { b"abc".to_vec() } else { b"abcd".to_vec() };
            Ok(io::Cursor::new(data))
        }

        fn describe(&self) -> String {
            "shifting test source".to_string()
        }
    }

    #[test]
    fn test_input_changing_between_passes_is_detected() {
        let result = encode(&mut ShiftingSource { passes: 0 }, Vec::new(), HeaderFormat::Framed);
        assert!(matches!(result, Err(HuffError::Io(e)) if e.kind() == ErrorKind::InvalidData));
    }
}
