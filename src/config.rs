// In: src/config.rs

//! The single source of truth for all huffpack codec configuration.
//!
//! `CodecConfig` is created once at the application boundary (the CLI, a JSON
//! file, or a library caller) and passed by reference into the bridge API.
//! Decompression needs no configuration: the container describes itself.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HuffError;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// Selects how the code table is framed inside the output file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFormat {
    /// **Default:** Magic + version preamble, then a header of length-prefixed
    /// entries. Every byte value (including `0x03` and `0x1E`) is encodable
    /// because the terminator lives outside the byte alphabet.
    #[default]
    Framed,

    /// The separator-framed layout used before the framed container. The
    /// terminator is written as byte `0x03`, so inputs containing `0x03` or the
    /// `0x1E` record separator are refused.
    Legacy,
}

/// Decides how the encoder obtains its two views of the input.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputStrategy {
    /// **Default:** Open and scan the input twice, once to count and once to
    /// encode. Memory use is independent of the input size.
    #[default]
    TwoPass,

    /// Read the whole input into memory once and run both passes over the
    /// buffer. Bounded by `max_buffered_input`.
    Buffered,
}

//==================================================================================
// II. The Unified CodecConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CodecConfig {
    /// Header framing written by the encoder.
    #[serde(default)]
    pub header_format: HeaderFormat,

    /// Two-pass file scanning or a single in-memory read.
    #[serde(default)]
    pub input_strategy: InputStrategy,

    /// Capacity of the buffered readers and writers wrapped around files.
    #[serde(default = "default_io_buffer_size")]
    pub io_buffer_size: usize,

    /// Largest input, in bytes, the `Buffered` strategy will load into memory.
    #[serde(default = "default_max_buffered_input")]
    pub max_buffered_input: u64,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            header_format: HeaderFormat::default(),
            input_strategy: InputStrategy::default(),
            io_buffer_size: default_io_buffer_size(),
            max_buffered_input: default_max_buffered_input(),
        }
    }
}

impl CodecConfig {
    /// Loads a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, HuffError> {
        let text = std::fs::read_to_string(path).map_err(|e| HuffError::open(path, e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, HuffError> {
        let config: CodecConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no codec run could honour.
    pub fn validate(&self) -> Result<(), HuffError> {
        if self.io_buffer_size == 0 {
            return Err(HuffError::Config(
                "io_buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.input_strategy == InputStrategy::Buffered && self.max_buffered_input == 0 {
            return Err(HuffError::Config(
                "max_buffered_input must be greater than zero for the buffered strategy"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Helper for `serde` to provide a default for `io_buffer_size`.
fn default_io_buffer_size() -> usize {
    64 * 1024
}

/// Helper for `serde` to provide a default for `max_buffered_input`.
fn default_max_buffered_input() -> u64 {
    256 * 1024 * 1024
}
