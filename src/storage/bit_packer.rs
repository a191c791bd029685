//! The write half of the storage layer: turns a sequence of variable-length
//! codes into byte-aligned output, most-significant bit first.

use std::io::Write;

use bitvec::prelude::*;

use crate::storage::MAX_HEADER_LEN;
use crate::error::HuffError;

/// Buffers bits between byte boundaries and writes each completed byte to the
/// sink.
///
/// Protocol: `set_header` exactly once, then any number of `insert` calls, then
/// `close`. `close` consumes the packer, so nothing can be inserted afterwards.
#[derive(Debug)]
pub struct BitPacker<W: Write> {
    sink: W,
    /// Pending bits, left-aligned as they arrive; only the low `pending_len`
    /// bits are meaningful.
    pending: u8,
    pending_len: u8,
    /// Completed bytes staged during one `insert` call.
    staged: Vec<u8>,
    header_written: bool,
    payload_bytes: u64,
    payload_bits: u64,
}

/// Totals reported by [`BitPacker::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackerSummary {
    /// Payload bytes written, including the final padded byte.
    pub payload_bytes: u64,
    /// Bits inserted, excluding padding.
    pub payload_bits: u64,
}

impl<W: Write> BitPacker<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            pending: 0,
            pending_len: 0,
            staged: Vec::new(),
            header_written: false,
            payload_bytes: 0,
            payload_bits: 0,
        }
    }

    /// Writes the header block behind its 4-byte little-endian length.
    pub fn set_header(&mut self, header: &[u8]) -> Result<(), HuffError> {
        if self.header_written {
            return Err(HuffError::HeaderState("header was already written".to_string()));
        }
        if header.len() > MAX_HEADER_LEN {
            return Err(HuffError::HeaderState(format!(
                "header of {} bytes exceeds the {MAX_HEADER_LEN}-byte limit",
                header.len()
            )));
        }
        self.sink.write_all(&(header.len() as u32).to_le_bytes())?;
        self.sink.write_all(header)?;
        self.header_written = true;
        Ok(())
    }

    /// Appends `bits` and flushes every completed group of 8.
    pub fn insert(&mut self, bits: &BitSlice<u8, Msb0>) -> Result<(), HuffError> {
        if !self.header_written {
            return Err(HuffError::HeaderState(
                "payload bits inserted before the header".to_string(),
            ));
        }

        for bit in bits.iter().by_vals() {
            self.pending = (self.pending << 1) | bit as u8;
            self.pending_len += 1;
            if self.pending_len == 8 {
                self.staged.push(self.pending);
                self.pending = 0;
                self.pending_len = 0;
            }
        }
        self.payload_bits += bits.len() as u64;

        if !self.staged.is_empty() {
            self.sink.write_all(&self.staged)?;
            self.payload_bytes += self.staged.len() as u64;
            self.staged.clear();
        }
        Ok(())
    }

    /// Number of bits waiting for a byte boundary.
    pub fn pending_bits(&self) -> usize {
        self.pending_len as usize
    }

    /// Writes the final partial byte right-padded with zeros, flushes the sink
    /// and hands it back.
    pub fn close(mut self) -> Result<(W, PackerSummary), HuffError> {
        if !self.header_written {
            return Err(HuffError::HeaderState(
                "packer closed before the header was written".to_string(),
            ));
        }
        if self.pending_len > 0 {
            let last = self.pending << (8 - self.pending_len);
            self.sink.write_all(&[last])?;
            self.payload_bytes += 1;
        }
        self.sink.flush()?;

        let summary = PackerSummary {
            payload_bytes: self.payload_bytes,
            payload_bits: self.payload_bits,
        };
        Ok((self.sink, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitVec<u8, Msb0> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_packs_msb_first_and_pads_with_zeros() {
        let mut packer = BitPacker::new(Vec::new());
        packer.set_header(b"This is my header").unwrap();
        packer.insert(&bits("0110100001101010101111")).unwrap();
        packer.insert(&bits("1100111")).unwrap();
        let (out, summary) = packer.close().unwrap();

        let mut expected = 17u32.to_le_bytes().to_vec();
        expected.extend_from_slice(b"This is my header");
        // 01101000 01101010 10111111 00111000
        expected.extend_from_slice(&[0x68, 0x6A, 0xBF, 0x38]);
        assert_eq!(out, expected);
        assert_eq!(summary.payload_bits, 29);
        assert_eq!(summary.payload_bytes, 4);
    }

    #[test]
    fn test_byte_aligned_payload_adds_no_padding_byte() {
        let mut packer = BitPacker::new(Vec::new());
        packer.set_header(&[]).unwrap();
        packer.insert(&bits("1010")).unwrap();
        assert_eq!(packer.pending_bits(), 4);
        packer.insert(&bits("1010")).unwrap();
        assert_eq!(packer.pending_bits(), 0);
        let (out, _) = packer.close().unwrap();
        assert_eq!(out, vec![0, 0, 0, 0, 0xAA]);
    }

    #[test]
    fn test_insert_before_header_is_rejected() {
        let mut packer = BitPacker::new(Vec::new());
        let result = packer.insert(&bits("1"));
        assert!(matches!(result, Err(HuffError::HeaderState(_))));
    }

    #[test]
    fn test_second_header_is_rejected() {
        let mut packer = BitPacker::new(Vec::new());
        packer.set_header(b"a").unwrap();
        assert!(matches!(
            packer.set_header(b"b"),
            Err(HuffError::HeaderState(_))
        ));
    }

    #[test]
    fn test_close_without_header_is_rejected() {
        let packer = BitPacker::new(Vec::new());
        assert!(matches!(packer.close(), Err(HuffError::HeaderState(_))));
    }
}
