// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Codec Pipeline
// ====================================================================================
//
// Compression:
//
//   ByteSource --pass 1--> kernels::frequency --> kernels::tree --> kernels::header
//        |                                                               |
//        `----pass 2--> byte -> code lookup --> storage::BitPacker <-----'
//                                                    |
//                                                    `-> preamble | len | header | payload
//
// Decompression:
//
//   storage::BitReader --> container header --> kernels::header --> tree rebuild
//        |                                                              |
//        `--> 8-bit groups --> walker::TreeWalker (state machine) <-----'
//                                     |
//                                     `-> decoded bytes
//
// Input files are opened only by the `source` adapters. Output paths, and the
// decision of which adapter to use, belong to the bridge.
// ====================================================================================

pub mod container;
pub mod decoder;
pub mod encoder;
pub mod source;
pub mod walker;

pub use decoder::{decode, DecodeSummary};
pub use encoder::{encode, EncodeSummary};
pub use source::{FileSource, MemorySource};
