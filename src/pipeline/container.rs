//! Reading and writing the container framing that surrounds the header block:
//! the optional magic/version preamble and the header length prefix.

use std::io::{Read, Write};

use crate::config::HeaderFormat;
use crate::error::HuffError;
use crate::storage::BitReader;

/// The magic number that opens a framed huffpack file.
pub const FILE_MAGIC: &[u8; 4] = b"HUFP";
/// The current version of the framed container.
pub const FILE_FORMAT_VERSION: u16 = 1;

/// Everything that precedes the payload, as read back from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub format: HeaderFormat,
    pub version: Option<u16>,
    /// The serialized code table, without its length prefix.
    pub block: Vec<u8>,
    /// Bytes consumed from the start of the file up to the payload.
    pub size: usize,
}

/// Writes the framed preamble. Legacy files have none. Returns the bytes written.
pub fn write_preamble<W: Write>(sink: &mut W, format: HeaderFormat) -> Result<usize, HuffError> {
    match format {
        HeaderFormat::Framed => {
            sink.write_all(FILE_MAGIC)?;
            sink.write_all(&FILE_FORMAT_VERSION.to_le_bytes())?;
            Ok(FILE_MAGIC.len() + 2)
        }
        HeaderFormat::Legacy => Ok(0),
    }
}

/// Reads the preamble (if any) and the header block.
///
/// A file that opens with the magic is framed. Anything else is taken to be a
/// legacy file whose first four bytes are the header length.
pub fn read_container_header<R: Read>(
    reader: &mut BitReader<R>,
) -> Result<ContainerHeader, HuffError> {
    let lead = reader.read_array::<4>("container preamble")?;

    if &lead == FILE_MAGIC {
        let version = u16::from_le_bytes(reader.read_array::<2>("format version")?);
        if version != FILE_FORMAT_VERSION {
            return Err(HuffError::FormatError(format!(
                "unsupported container version {version}; this build reads version {FILE_FORMAT_VERSION}"
            )));
        }
        let block = reader.read_header()?;
        Ok(ContainerHeader {
            format: HeaderFormat::Framed,
            version: Some(version),
            size: FILE_MAGIC.len() + 2 + 4 + block.len(),
            block,
        })
    } else {
        let block = reader.read_header_block(u32::from_le_bytes(lead))?;
        Ok(ContainerHeader {
            format: HeaderFormat::Legacy,
            version: None,
            size: 4 + block.len(),
            block,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::BitPacker;

    fn container(format: HeaderFormat, header: &[u8]) -> Vec<u8> {
        let mut sink = Vec::new();
        write_preamble(&mut sink, format).unwrap();
        let mut packer = BitPacker::new(sink);
        packer.set_header(header).unwrap();
        packer.close().unwrap().0
    }

    #[test]
    fn test_framed_preamble_is_detected() {
        let bytes = container(HeaderFormat::Framed, b"abc");
        assert_eq!(&bytes[..4], b"HUFP");
        let mut reader = BitReader::new(bytes.as_slice());
        let header = read_container_header(&mut reader).unwrap();
        assert_eq!(header.format, HeaderFormat::Framed);
        assert_eq!(header.version, Some(FILE_FORMAT_VERSION));
        assert_eq!(header.block, b"abc");
        assert_eq!(header.size, bytes.len());
    }

    #[test]
    fn test_missing_magic_means_legacy() {
        let bytes = container(HeaderFormat::Legacy, b"a0\x1e");
        let mut reader = BitReader::new(bytes.as_slice());
        let header = read_container_header(&mut reader).unwrap();
        assert_eq!(header.format, HeaderFormat::Legacy);
        assert_eq!(header.version, None);
        assert_eq!(header.block, b"a0\x1e");
        assert_eq!(header.size, 7);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let mut bytes = container(HeaderFormat::Framed, b"");
        bytes[4..6].copy_from_slice(&(FILE_FORMAT_VERSION + 1).to_le_bytes());
        let mut reader = BitReader::new(bytes.as_slice());
        assert!(matches!(
            read_container_header(&mut reader),
            Err(HuffError::FormatError(msg)) if msg.contains("unsupported container version")
        ));
    }

    #[test]
    fn test_empty_file_is_format_error() {
        let mut reader = BitReader::new(&[0u8; 0][..]);
        assert!(matches!(
            read_container_header(&mut reader),
            Err(HuffError::FormatError(msg)) if msg.contains("preamble")
        ));
    }
}
