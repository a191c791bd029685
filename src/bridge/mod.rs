// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the huffpack library. It wraps the
// stream-oriented `pipeline` engine in calls that take paths or byte slices and
// return report structs.
//
// Data Flow (Compression):
//
//   1. [File API (compress)]             -> Receives input/output paths + CodecConfig
//         |
//         `-> a. Validates config, refuses input == output
//         |
//         `-> b. Wraps the input as a `FileSource` (two passes) or reads it into a
//                `MemorySource` (buffered)
//
//   2. [Pipeline Engine (pipeline::encode)] -> Writes the container into a BufWriter
//
//   3. [File API]                        -> Flushes, or removes the partial output
//
// Data Flow (Decompression):
//
//   1. [File API (decompress)] / [Stateless API (decompress_bytes)]
//         |
//         `-> Hands a reader to `pipeline::decode`, which detects the format
//
//   2. [Stateless API (inspect)]         -> Reads only the container header
//
// ====================================================================================
pub mod file_api;
pub mod format;
pub mod stateless_api;

// --- Path-Based API (used by the CLI) ---
pub use file_api::{compress, decompress};

// --- In-Memory API ---
pub use stateless_api::{compress_bytes, compress_bytes_with_stats, decompress_bytes, inspect};

// --- Format Constants and Structs ---
pub use format::{CompressionStats, DecompressionStats, HeaderInfo};
