use ntex_bytes::BufMut;

use crate::frame::{ControlHead, Frame, FrameError, Kind, Reason, StreamId, Version};

/// RST_STREAM frame, aborting a stream with a status code.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Reset {
    stream_id: StreamId,
    status: Reason,
}

impl Reset {
    pub fn new(stream_id: StreamId, status: Reason) -> Reset {
        Reset { stream_id, status }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn status(&self) -> Reason {
        self.status
    }

    /// Builds a `Reset` frame from a raw control frame payload.
    pub(crate) fn load(head: ControlHead, payload: &[u8]) -> Result<Reset, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Reset);

        // RST_STREAM defines no flags.
        if head.flag() != 0 {
            return Err(FrameError::InvalidFlags(head.flag()));
        }

        if payload.len() != 8 {
            return Err(FrameError::IncorrectDataLength {
                read: payload.len(),
                expected: 8,
            });
        }

        let stream_id = StreamId::parse(&payload[..4]);
        let status = unpack_octets_4!(payload, 4, u32);

        Ok(Reset {
            stream_id,
            status: status.into(),
        })
    }

    pub(crate) fn encode<B: BufMut>(&self, version: Version, dst: &mut B) {
        log::trace!(
            "encoding RST_STREAM; id={:?} status={:?}",
            self.stream_id,
            self.status
        );
        let head = ControlHead::new(version, Kind::Reset, 0);
        head.encode(8, dst);
        dst.put_u32(self.stream_id.into());
        dst.put_u32(self.status.into());
    }
}

impl From<Reset> for Frame {
    fn from(src: Reset) -> Frame {
        Frame::Reset(src)
    }
}
