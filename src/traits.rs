//! This module defines shared traits used across the pipeline stages.

use std::io::Read;

use crate::error::HuffError;

/// Something the encoder can open for a fresh, independent read pass.
///
/// Encoding needs the input twice: once to count symbol frequencies and once to
/// emit codes. Implementors decide whether that means reopening a file or
/// re-reading an in-memory buffer, which keeps `compress` independent of the
/// two-pass vs. buffered choice.
pub trait ByteSource {
    type Reader: Read;

    /// Opens a new reader positioned at the first byte of the input.
    fn open_pass(&mut self) -> Result<Self::Reader, HuffError>;

    /// A short, human-readable description used in diagnostics.
    fn describe(&self) -> String;
}
