use ntex_bytes::BufMut;

use crate::frame::{ControlHead, Frame, FrameError, Kind, StreamId, Version};

const DELTA_MASK: u32 = (1 << 31) - 1;

/// WINDOW_UPDATE frame (v3 only), growing a stream's send window.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct WindowUpdate {
    stream_id: StreamId,
    delta: u32,
}

impl WindowUpdate {
    /// `delta` must be in `1..=2^31 - 1`; the reserved top bit is
    /// dropped.
    pub fn new(stream_id: StreamId, delta: u32) -> WindowUpdate {
        WindowUpdate {
            stream_id,
            delta: delta & DELTA_MASK,
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn delta(&self) -> u32 {
        self.delta
    }

    /// Builds a `WindowUpdate` frame from a raw control frame payload.
    pub(crate) fn load(head: ControlHead, payload: &[u8]) -> Result<WindowUpdate, FrameError> {
        debug_assert_eq!(head.kind(), Kind::WindowUpdate);

        // WINDOW_UPDATE defines no flags.
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
        // The top bit is reserved and ignored on receipt.
        let delta = unpack_octets_4!(payload, 4, u32) & DELTA_MASK;
        if delta == 0 {
            return Err(FrameError::InvalidWindowUpdateValue);
        }

        Ok(WindowUpdate { stream_id, delta })
    }

    pub(crate) fn encode<B: BufMut>(&self, version: Version, dst: &mut B) {
        log::trace!(
            "encoding WINDOW_UPDATE; id={:?} delta={}",
            self.stream_id,
            self.delta
        );
        let head = ControlHead::new(version, Kind::WindowUpdate, 0);
        head.encode(8, dst);
        dst.put_u32(self.stream_id.into());
        dst.put_u32(self.delta);
    }
}

impl From<WindowUpdate> for Frame {
    fn from(src: WindowUpdate) -> Frame {
        Frame::WindowUpdate(src)
    }
}
