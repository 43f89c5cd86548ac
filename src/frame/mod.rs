use std::fmt;

/// Unpacks 4 bytes of `$buf`, starting at `$offset`, as a big-endian
/// value of the given integer type.
macro_rules! unpack_octets_4 {
    ($buf:expr, $offset:expr, $tip:ty) => {
        (($buf[$offset + 0] as $tip) << 24)
            | (($buf[$offset + 1] as $tip) << 16)
            | (($buf[$offset + 2] as $tip) << 8)
            | (($buf[$offset + 3] as $tip) << 0)
    };
}

mod credential;
mod data;
mod go_away;
mod head;
mod headers;
mod noop;
mod ping;
mod reason;
mod reset;
mod settings;
mod stream_id;
mod syn_reply;
mod syn_stream;
mod util;
mod version;
mod window_update;

pub use self::credential::Credential;
pub use self::data::Data;
pub use self::go_away::{GoAway, GoAwayStatus};
pub use self::head::{ControlHead, DataHead, Head, Kind};
pub use self::headers::{Headers, HeadersFlags};
pub use self::noop::Noop;
pub use self::ping::Ping;
pub use self::reason::Reason;
pub use self::reset::Reset;
pub use self::settings::{Setting, SettingFlags, SettingId, Settings, SettingsFlags};
pub use self::stream_id::StreamId;
pub use self::syn_reply::{SynReply, SynReplyFlags};
pub use self::syn_stream::{SynStream, SynStreamFlags};
pub use self::version::Version;
pub use self::window_update::WindowUpdate;

use crate::zlib::BlockError;

/// Size of the common frame header.
pub const HEADER_LEN: usize = 8;

pub enum Frame {
    SynStream(SynStream),
    SynReply(SynReply),
    Reset(Reset),
    Settings(Settings),
    Noop(Noop),
    Ping(Ping),
    GoAway(GoAway),
    Headers(Headers),
    WindowUpdate(WindowUpdate),
    Credential(Credential),
    Data(Data),
}

impl Frame {
    /// Whether this frame type may be sent on the given protocol
    /// version.
    pub(crate) fn is_defined(&self, version: Version) -> bool {
        match self {
            Frame::Noop(_) => version == Version::V2,
            Frame::WindowUpdate(_) | Frame::Credential(_) => version == Version::V3,
            _ => true,
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        use self::Frame::*;

        match *self {
            SynStream(ref frame) => fmt::Debug::fmt(frame, fmt),
            SynReply(ref frame) => fmt::Debug::fmt(frame, fmt),
            Reset(ref frame) => fmt::Debug::fmt(frame, fmt),
            Settings(ref frame) => fmt::Debug::fmt(frame, fmt),
            Noop(ref frame) => fmt::Debug::fmt(frame, fmt),
            Ping(ref frame) => fmt::Debug::fmt(frame, fmt),
            GoAway(ref frame) => fmt::Debug::fmt(frame, fmt),
            Headers(ref frame) => fmt::Debug::fmt(frame, fmt),
            WindowUpdate(ref frame) => fmt::Debug::fmt(frame, fmt),
            Credential(ref frame) => fmt::Debug::fmt(frame, fmt),
            Data(ref frame) => fmt::Debug::fmt(frame, fmt),
        }
    }
}

/// Errors that can occur during parsing a SPDY frame.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// A control frame carried a protocol version other than 2 or 3.
    #[error("Unsupported protocol version {0}")]
    UnsupportedVersion(u16),

    /// A control frame carried a valid version that is not the version
    /// this framer was constructed with.
    #[error("Frame version {0} does not match the connection version")]
    UnexpectedVersion(u16),

    /// A control frame type that is unknown, or not defined in the
    /// connection's protocol version.
    #[error("Invalid control frame type {0}")]
    InvalidKind(u16),

    /// Flag bits outside the frame type's allowed set.
    #[error("Invalid frame flags {0:#04x}")]
    InvalidFlags(u8),

    /// The payload length declared by a fixed-size frame was not the
    /// value required for its type.
    #[error("Incorrect data length, read {read} but expected {expected}")]
    IncorrectDataLength { read: usize, expected: usize },

    /// An invalid stream identifier was provided.
    #[error("An invalid stream identifier was provided")]
    InvalidStreamId,

    /// A WINDOW_UPDATE delta of zero.
    #[error("An invalid window update delta was provided")]
    InvalidWindowUpdateValue,

    /// A variable-length payload is truncated or inconsistent.
    #[error("A frame payload is malformed")]
    Malformed,

    /// Frame size exceeded.
    #[error("Frame size exceeded")]
    MaxFrameSize,

    /// Failed to process a compressed header block. Fatal to the
    /// connection: the shared zlib state is out of sync.
    #[error("{0}")]
    Compression(#[from] BlockError),
}
