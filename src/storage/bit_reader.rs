//! The read half of the storage layer: pulls the header block and then one
//! 8-bit group at a time from a byte source.

use std::io::{ErrorKind, Read};

use bitvec::prelude::*;

use crate::storage::MAX_HEADER_LEN;
use crate::error::HuffError;

/// Eight payload bits in transmission order.
pub type BitGroup = BitArray<[u8; 1], Msb0>;

#[derive(Debug)]
pub struct BitReader<R: Read> {
    source: R,
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            bytes_read: 0,
        }
    }

    /// Reads exactly `N` bytes. Running out of input is a format error naming
    /// `what` was being read.
    pub fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N], HuffError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf, what)?;
        Ok(buf)
    }

    /// Reads the 4-byte little-endian length and the header block behind it.
    pub fn read_header(&mut self) -> Result<Vec<u8>, HuffError> {
        let len = u32::from_le_bytes(self.read_array::<4>("header length")?);
        self.read_header_block(len)
    }

    /// Reads a header block whose length prefix has already been consumed.
    pub fn read_header_block(&mut self, len: u32) -> Result<Vec<u8>, HuffError> {
        let len = len as usize;
        if len > MAX_HEADER_LEN {
            return Err(HuffError::FormatError(format!(
                "header length {len} exceeds the {MAX_HEADER_LEN}-byte limit"
            )));
        }
        let mut block = vec![0u8; len];
        self.fill(&mut block, "header block")?;
        Ok(block)
    }

    /// Returns the next 8 bits, or `None` once the source is exhausted.
    pub fn extract(&mut self) -> Result<Option<BitGroup>, HuffError> {
        let mut byte = [0u8; 1];
        loop {
            match self.source.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_read += 1;
                    return Ok(Some(BitGroup::new(byte)));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Total bytes consumed so far, header included.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn fill(&mut self, buf: &mut [u8], what: &str) -> Result<(), HuffError> {
        match self.source.read_exact(buf) {
            Ok(()) => {
                self.bytes_read += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(HuffError::FormatError(
                format!("input ends inside the {what}"),
            )),
            Err(e) => Err(e.into()),
        }
    }
}
