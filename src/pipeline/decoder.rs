//! The decompression orchestrator: container header -> code table -> rebuilt
//! tree -> bit-by-bit walk until the terminator.

use std::io::{Read, Write};

use crate::config::HeaderFormat;
use crate::error::HuffError;
use crate::kernels::{header, tree};
use crate::pipeline::container;
use crate::pipeline::walker::{Step, TreeWalker};
use crate::storage::BitReader;
use crate::types::Symbol;

/// Totals gathered while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSummary {
    pub format: HeaderFormat,
    /// Compressed bytes consumed, up to and including the terminator's byte.
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Decodes one container from `source` into `sink`.
///
/// Bits after the terminator's code are padding and are not read.
pub fn decode<R, W>(source: R, mut sink: W) -> Result<(W, DecodeSummary), HuffError>
where
    R: Read,
    W: Write,
{
    let mut reader = BitReader::new(source);
    let container = container::read_container_header(&mut reader)?;
    let code_table = header::deserialize(&container.block, container.format)?;
    if !code_table.contains_key(&Symbol::Terminator) {
        return Err(HuffError::FormatError(
            "code table has no end-of-payload entry".to_string(),
        ));
    }
    let code_tree = tree::reconstruct_tree(&code_table)?;
    log_metric!(
        "event" = "decode",
        "stage" = "tree",
        "format" = format!("{:?}", container.format),
        "symbols" = code_table.len(),
        "nodes" = code_tree.len(),
    );

    let mut walker = TreeWalker::new(&code_tree);
    let mut output_bytes = 0u64;
    'groups: while let Some(group) = reader.extract()? {
        for bit in group.iter().by_vals() {
            match walker.feed(bit)? {
                Step::Continue => {}
                Step::Emit(byte) => {
                    sink.write_all(&[byte])?;
                    output_bytes += 1;
                }
                Step::Terminated => break 'groups,
            }
        }
    }
    walker.finish()?;
    sink.flush()?;

    let summary = DecodeSummary {
        format: container.format,
        input_bytes: reader.bytes_read(),
        output_bytes,
    };
    log_metric!(
        "event" = "decode",
        "stage" = "done",
        "input_bytes" = summary.input_bytes,
        "output_bytes" = summary.output_bytes,
    );
    Ok((sink, summary))
}
