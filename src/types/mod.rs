//! This module defines the core, strongly-typed data representations used
//! throughout the huffpack codec.
//!
//! It currently includes the `Symbol` alphabet (bytes plus an out-of-band
//! terminator), the bit-level `Code` type, and the frequency and code tables
//! that connect the analysis, tree and header stages.

pub mod symbol;

// Re-export the main type(s) for easier access.
pub use symbol::{code_to_string, Code, CodeTable, FrequencyTable, Symbol};
