//! Concrete `ByteSource` implementations: a reopenable file and a borrowed
//! in-memory buffer.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::HuffError;
use crate::traits::ByteSource;

/// Reopens the file on every pass.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    buffer_size: usize,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, buffer_size: usize) -> Self {
        Self {
            path: path.into(),
            buffer_size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    type Reader = BufReader<File>;

    fn open_pass(&mut self) -> Result<Self::Reader, HuffError> {
        let file = File::open(&self.path).map_err(|e| HuffError::open(&self.path, e))?;
        Ok(BufReader::with_capacity(self.buffer_size, file))
    }

    fn describe(&self) -> String {
        format!("file '{}'", self.path.display())
    }
}

/// Serves every pass from the same borrowed buffer.
#[derive(Debug, Clone, Copy)]
pub struct MemorySource<'a> {
    bytes: &'a [u8],
}

impl<'a> MemorySource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl<'a> ByteSource for MemorySource<'a> {
    type Reader = &'a [u8];

    fn open_pass(&mut self) -> Result<Self::Reader, HuffError> {
        Ok(self.bytes)
    }

    fn describe(&self) -> String {
        format!("{} in-memory bytes", self.bytes.len())
    }
}

/// Reads an entire file into memory, refusing files above `limit` bytes.
pub fn read_bounded(path: &Path, limit: u64) -> Result<Vec<u8>, HuffError> {
    let file = File::open(path).map_err(|e| HuffError::open(path, e))?;
    let len = file.metadata()?.len();
    if len > limit {
        return Err(HuffError::Config(format!(
            "'{}' is {} bytes, above the buffered input limit of {} bytes",
            path.display(),
            len,
            limit
        )));
    }
    let mut bytes = Vec::with_capacity(len as usize);
    // The file may grow between the metadata call and the read.
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes)?;
    if bytes.len() as u64 > limit {
        return Err(HuffError::Config(format!(
            "'{}' grew above the buffered input limit of {} bytes",
            path.display(),
            limit
        )));
    }
    Ok(bytes)
}
