//! The pure, stateless building blocks of the codec.
//!
//! Nothing here touches a file or a stream position: every kernel takes owned or
//! borrowed values and returns new ones. The `pipeline` module sequences them.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Stage 1: Symbol Statistics
pub mod frequency;

/// Stage 2: Prefix Tree and Code Assignment
pub mod tree;

/// Stage 3: Header Serialization
pub mod header;
pub mod leb128;
