use ntex_bytes::BufMut;

use crate::frame::{ControlHead, Frame, FrameError, Kind, Version};

/// NOOP frame (v2 only). Carries nothing and requires nothing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Noop;

impl Noop {
    pub fn new() -> Noop {
        Noop
    }

    /// Builds a `Noop` frame from a raw control frame payload.
    pub(crate) fn load(head: ControlHead, payload: &[u8]) -> Result<Noop, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Noop);

        // NOOP defines no flags.
        if head.flag() != 0 {
            return Err(FrameError::InvalidFlags(head.flag()));
        }

        if !payload.is_empty() {
            return Err(FrameError::IncorrectDataLength {
                read: payload.len(),
                expected: 0,
            });
        }

        Ok(Noop)
    }

    pub(crate) fn encode<B: BufMut>(&self, version: Version, dst: &mut B) {
        log::trace!("encoding NOOP");
        let head = ControlHead::new(version, Kind::Noop, 0);
        head.encode(0, dst);
    }
}

impl From<Noop> for Frame {
    fn from(src: Noop) -> Frame {
        Frame::Noop(src)
    }
}
