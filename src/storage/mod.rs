//! The bit-level storage layer shared by the encoder and decoder.
//!
//! `BitPacker` writes a length-prefixed header followed by a zero-padded,
//! MSB-first bit stream; `BitReader` reads the same layout back one byte at a
//! time. Neither knows anything about Huffman codes.

/// Upper bound on a header block. The largest legitimate header, a legacy table
/// of 257 maximally skewed codes, stays well below this.
pub const MAX_HEADER_LEN: usize = 64 * 1024;

pub mod bit_packer;
pub mod bit_reader;

pub use bit_packer::{BitPacker, PackerSummary};
pub use bit_reader::{BitGroup, BitReader};
