//! This file is the root of the `huffpack` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`pipeline`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the handful of names most callers need, so that
//!     `huffpack::compress(...)` works without reaching into `bridge`.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod bridge;
pub mod config;
pub mod kernels;
pub mod pipeline;
pub mod storage;
pub mod traits;
pub mod types;

mod error;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use bridge::{
    compress, compress_bytes, compress_bytes_with_stats, decompress, decompress_bytes, inspect,
    CompressionStats, DecompressionStats, HeaderInfo,
};
pub use config::{CodecConfig, HeaderFormat, InputStrategy};
pub use error::{HuffError, Result};
pub use types::{Code, CodeTable, FrequencyTable, Symbol};
