//! Connection-scoped header-block compression.
//!
//! SPDY compresses every name/value header block with a single zlib
//! stream per connection direction, primed with a version-specific
//! dictionary. The stream state carries across frames: the bytes each
//! block compresses to depend on every block before it, so compressed
//! output must reach the peer in exactly the order it was produced, and
//! a single corrupt block poisons the channel for good.

mod decoder;
mod encoder;

pub mod dictionary;

pub use self::decoder::Decompressor;
pub use self::encoder::Compressor;
pub use self::dictionary::{HEADER_DICTIONARY_V2, HEADER_DICTIONARY_V3};

/// Errors raised while compressing or decompressing a header block.
///
/// All of these are connection-fatal: once a block fails, the shared
/// zlib state on the two peers can no longer be assumed to agree.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// A declared name or value length exceeds the remaining header
    /// block allowance.
    #[error("Header block length over maximum")]
    Overflow,

    /// The decompressed block is truncated or structurally invalid.
    #[error("Malformed header block")]
    Malformed,

    /// A header name is not valid UTF-8, or (SPDY/3) is empty or
    /// contains uppercase characters.
    #[error("Invalid header name")]
    InvalidName,

    /// The underlying zlib stream failed.
    #[error("Header block compression failed")]
    Compression,
}
