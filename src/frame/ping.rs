use ntex_bytes::BufMut;

use crate::frame::{ControlHead, Frame, FrameError, Kind, Version};

/// PING frame.
///
/// Odd ids are client-initiated, even ids server-initiated; a receiver
/// answers with an identical PING.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ping {
    id: u32,
}

impl Ping {
    pub fn new(id: u32) -> Ping {
        Ping { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_client_initiated(&self) -> bool {
        self.id % 2 == 1
    }

    /// Builds a `Ping` frame from a raw control frame payload.
    pub(crate) fn load(head: ControlHead, payload: &[u8]) -> Result<Ping, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Ping);

        // PING defines no flags.
        if head.flag() != 0 {
            return Err(FrameError::InvalidFlags(head.flag()));
        }

        if payload.len() != 4 {
            return Err(FrameError::IncorrectDataLength {
                read: payload.len(),
                expected: 4,
            });
        }

        Ok(Ping {
            id: unpack_octets_4!(payload, 0, u32),
        })
    }

    pub(crate) fn encode<B: BufMut>(&self, version: Version, dst: &mut B) {
        log::trace!("encoding PING; id={}", self.id);
        let head = ControlHead::new(version, Kind::Ping, 0);
        head.encode(4, dst);
        dst.put_u32(self.id);
    }
}

impl From<Ping> for Frame {
    fn from(src: Ping) -> Frame {
        Frame::Ping(src)
    }
}
