// In: src/error.rs

//! This module defines the single, unified error type for the entire huffpack library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// The compressed stream is malformed: bad header, truncated payload,
    /// misplaced separators or an unknown format version.
    #[error("Malformed compressed stream: {0}")]
    FormatError(String),

    /// A prefix tree cannot be built from a frequency table with no symbols.
    #[error("Cannot build a prefix tree from an empty frequency table")]
    DegenerateInput,

    /// The legacy header format reserves this byte and cannot carry it.
    #[error("Input contains byte {0:#04x}, which the legacy format reserves")]
    ReservedByte(u8),

    #[error("Header protocol violated: {0}")]
    HeaderState(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// A resource could not be opened or created.
    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An error originating from the underlying I/O subsystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, raised while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl HuffError {
    /// Shorthand for wrapping an open/create failure with the offending path.
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HuffError::Open {
            path: path.into(),
            source,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T, E = HuffError> = std::result::Result<T, E>;
