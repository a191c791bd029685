// In: src/bridge/file_api.rs

//! Path-based compression and decompression, the API the command-line tool
//! drives.
//!
//! These functions own file handles and buffering. An output file is only
//! created once the input has been opened successfully, and it is removed again
//! if the codec fails part way through.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::bridge::format::{CompressionStats, DecompressionStats};
use crate::config::{CodecConfig, InputStrategy};
use crate::error::HuffError;
use crate::pipeline::{self, source, EncodeSummary, FileSource, MemorySource};
use crate::traits::ByteSource;

//==================================================================================
// I. Public API
//==================================================================================

/// Compresses the file at `input` into a new file at `output`.
pub fn compress(
    input: &Path,
    output: &Path,
    config: &CodecConfig,
) -> Result<CompressionStats, HuffError> {
    config.validate()?;
    ensure_distinct(input, output)?;
    log::debug!(
        "compressing '{}' -> '{}' ({:?}, {:?})",
        input.display(),
        output.display(),
        config.header_format,
        config.input_strategy
    );

    let summary = match config.input_strategy {
        InputStrategy::TwoPass => {
            let mut source = FileSource::new(input, config.io_buffer_size);
            encode_to_file(&mut source, output, config)?
        }
        InputStrategy::Buffered => {
            let data = source::read_bounded(input, config.max_buffered_input)?;
            encode_to_file(&mut MemorySource::new(&data), output, config)?
        }
    };

    Ok(CompressionStats {
        format: config.header_format,
        input_size: summary.input_bytes,
        header_size: summary.header_bytes,
        payload_size: summary.payload_bytes,
        total_size: summary.header_bytes + summary.payload_bytes,
        distinct_symbols: summary.distinct_symbols,
    })
}

/// Decompresses the huffpack file at `input` into a new file at `output`.
/// The container format is detected from the file contents.
pub fn decompress(input: &Path, output: &Path) -> Result<DecompressionStats, HuffError> {
    ensure_distinct(input, output)?;
    log::debug!("decompressing '{}' -> '{}'", input.display(), output.display());

    let file = File::open(input).map_err(|e| HuffError::open(input, e))?;
    let input_size = file.metadata()?.len();
    let reader = BufReader::new(file);

    let sink = create_output(output)?;
    let summary = match pipeline::decode(reader, sink) {
        Ok((sink, summary)) => {
            finish_output(sink, output)?;
            summary
        }
        Err(e) => {
            discard_partial_output(output);
            return Err(e);
        }
    };

    Ok(DecompressionStats {
        format: summary.format,
        input_size,
        output_size: summary.output_bytes,
    })
}

//==================================================================================
// II. Helpers
//==================================================================================

fn encode_to_file<S: ByteSource>(
    source: &mut S,
    output: &Path,
    config: &CodecConfig,
) -> Result<EncodeSummary, HuffError> {
    // Fail on an unreadable input before touching the output path.
    drop(source.open_pass()?);

    let file = File::create(output).map_err(|e| HuffError::open(output, e))?;
    let sink = BufWriter::with_capacity(config.io_buffer_size, file);
    match pipeline::encode(source, sink, config.header_format) {
        Ok((sink, summary)) => {
            finish_output(sink, output)?;
            Ok(summary)
        }
        Err(e) => {
            discard_partial_output(output);
            Err(e)
        }
    }
}

fn create_output(output: &Path) -> Result<BufWriter<File>, HuffError> {
    let file = File::create(output).map_err(|e| HuffError::open(output, e))?;
    Ok(BufWriter::new(file))
}

/// Flushes the buffered writer and surfaces the error the drop would swallow.
fn finish_output(sink: BufWriter<File>, output: &Path) -> Result<(), HuffError> {
    let result = sink
        .into_inner()
        .map_err(|e| HuffError::Io(e.into_error()))
        .and_then(|file| file.sync_all().map_err(HuffError::from));
    if result.is_err() {
        discard_partial_output(output);
    }
    result
}

fn discard_partial_output(output: &Path) {
    if let Err(e) = fs::remove_file(output) {
        log::warn!(
            "could not remove partial output '{}': {}",
            output.display(),
            e
        );
    }
}

/// Refuses to write over the file being read.
fn ensure_distinct(input: &Path, output: &Path) -> Result<(), HuffError> {
    let same = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same {
        return Err(HuffError::Config(format!(
            "input and output are the same file: '{}'",
            input.display()
        )));
    }
    Ok(())
}
