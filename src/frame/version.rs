use std::{convert::TryFrom, fmt};

use crate::frame::FrameError;
use crate::zlib::dictionary::{HEADER_DICTIONARY_V2, HEADER_DICTIONARY_V3};

/// SPDY protocol version a framer is bound to.
///
/// The two wire versions share one codec; the handful of differences
/// between them (field widths, reserved bytes, the SETTINGS id layout,
/// the frame-type set) hang off this type as small lookup methods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Version {
    /// SPDY version 2
    V2,
    /// SPDY version 3
    V3,
}

impl Version {
    /// The version number carried in every control-frame header.
    pub fn number(self) -> u16 {
        match self {
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }

    /// Width in bytes of the pair-count and length fields inside a
    /// name/value header block.
    pub(crate) fn block_len_width(self) -> usize {
        match self {
            Version::V2 => 2,
            Version::V3 => 4,
        }
    }

    /// Reserved bytes between the stream id and the header block in
    /// SYN_REPLY and HEADERS frames.
    pub(crate) fn block_padding(self) -> usize {
        match self {
            Version::V2 => 2,
            Version::V3 => 0,
        }
    }

    /// Highest priority value encodable by this version. Priorities are
    /// 2 bits wide on v2 and 3 bits wide on v3, zero being most urgent.
    pub(crate) fn max_priority(self) -> u8 {
        match self {
            Version::V2 => 3,
            Version::V3 => 7,
        }
    }

    /// The preset zlib dictionary for header blocks.
    pub(crate) fn dictionary(self) -> &'static [u8] {
        match self {
            Version::V2 => HEADER_DICTIONARY_V2,
            Version::V3 => HEADER_DICTIONARY_V3,
        }
    }
}

impl TryFrom<u16> for Version {
    type Error = FrameError;

    fn try_from(value: u16) -> Result<Version, FrameError> {
        match value {
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            v => Err(FrameError::UnsupportedVersion(v)),
        }
    }
}

impl From<Version> for u16 {
    fn from(v: Version) -> u16 {
        v.number()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spdy/{}", self.number())
    }
}
