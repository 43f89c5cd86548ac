use std::fmt;

use ntex_bytes::BufMut;

use crate::frame::{ControlHead, Frame, FrameError, Kind, StreamId, Version};

/// GOAWAY frame, announcing the last stream this endpoint will process.
///
/// The status field exists only on v3; a v2 GOAWAY decodes with status
/// [`GoAwayStatus::OK`] and encodes without the status word.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GoAway {
    last_good_stream_id: StreamId,
    status: GoAwayStatus,
}

/// GOAWAY status codes.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GoAwayStatus(u32);

impl GoAway {
    pub fn new(last_good_stream_id: StreamId) -> GoAway {
        GoAway {
            last_good_stream_id,
            status: GoAwayStatus::OK,
        }
    }

    pub fn set_status(mut self, status: GoAwayStatus) -> Self {
        self.status = status;
        self
    }

    pub fn last_good_stream_id(&self) -> StreamId {
        self.last_good_stream_id
    }

    pub fn status(&self) -> GoAwayStatus {
        self.status
    }

    /// Builds a `GoAway` frame from a raw control frame payload.
    pub(crate) fn load(
        head: ControlHead,
        payload: &[u8],
        version: Version,
    ) -> Result<GoAway, FrameError> {
        debug_assert_eq!(head.kind(), Kind::GoAway);

        // GOAWAY defines no flags.
        if head.flag() != 0 {
            return Err(FrameError::InvalidFlags(head.flag()));
        }

        let expected = match version {
            Version::V2 => 4,
            Version::V3 => 8,
        };
        if payload.len() != expected {
            return Err(FrameError::IncorrectDataLength {
                read: payload.len(),
                expected,
            });
        }

        let last_good_stream_id = StreamId::parse(&payload[..4]);
        let status = match version {
            Version::V2 => GoAwayStatus::OK,
            Version::V3 => GoAwayStatus(unpack_octets_4!(payload, 4, u32)),
        };

        Ok(GoAway {
            last_good_stream_id,
            status,
        })
    }

    pub(crate) fn encode<B: BufMut>(&self, version: Version, dst: &mut B) {
        log::trace!(
            "encoding GOAWAY; last_good={:?} status={:?}",
            self.last_good_stream_id,
            self.status
        );
        let head = ControlHead::new(version, Kind::GoAway, 0);
        match version {
            Version::V2 => {
                head.encode(4, dst);
                dst.put_u32(self.last_good_stream_id.into());
            }
            Version::V3 => {
                head.encode(8, dst);
                dst.put_u32(self.last_good_stream_id.into());
                dst.put_u32(self.status.into());
            }
        }
    }
}

impl From<GoAway> for Frame {
    fn from(src: GoAway) -> Frame {
        Frame::GoAway(src)
    }
}

// ===== impl GoAwayStatus =====

impl GoAwayStatus {
    pub const OK: GoAwayStatus = GoAwayStatus(0);
    pub const PROTOCOL_ERROR: GoAwayStatus = GoAwayStatus(1);
    pub const INTERNAL_ERROR: GoAwayStatus = GoAwayStatus(2);
}

impl From<u32> for GoAwayStatus {
    fn from(src: u32) -> GoAwayStatus {
        GoAwayStatus(src)
    }
}

impl From<GoAwayStatus> for u32 {
    fn from(src: GoAwayStatus) -> u32 {
        src.0
    }
}

impl fmt::Debug for GoAwayStatus {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => fmt.write_str("OK"),
            1 => fmt.write_str("PROTOCOL_ERROR"),
            2 => fmt.write_str("INTERNAL_ERROR"),
            other => write!(fmt, "GoAwayStatus({})", other),
        }
    }
}
