use super::length_delimited::LengthDelimitedCodecError;
use crate::{frame, zlib};

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncoderError {
    #[error("Max size exceeded")]
    MaxSizeExceeded,

    /// The frame type does not exist in the connection's protocol
    /// version, e.g. NOOP on a v3 framer.
    #[error("Frame type is not defined in the connection version")]
    UnsupportedKind,

    /// Compressing a header block failed; the connection must be torn
    /// down.
    #[error("{0}")]
    Compression(#[from] zlib::BlockError),
}

impl From<LengthDelimitedCodecError> for frame::FrameError {
    fn from(_: LengthDelimitedCodecError) -> Self {
        frame::FrameError::MaxFrameSize
    }
}
