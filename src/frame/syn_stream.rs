use std::fmt;

use ntex_bytes::{BufMut, BytesMut};

use crate::frame::{util, ControlHead, Frame, FrameError, Kind, StreamId, Version};
use crate::headers::HeaderMap;
use crate::zlib::{BlockError, Compressor, Decompressor};

const FIN: u8 = 0x1;
const UNIDIRECTIONAL: u8 = 0x2;
const ALL: u8 = FIN | UNIDIRECTIONAL;

/// Fixed payload bytes before the compressed header block.
const PREFIX: usize = 10;

/// SYN_STREAM frame, opening a new stream.
///
/// Carries the stream id, an optional associated stream id (zero when
/// absent), a priority, the v3 credential slot, and a compressed header
/// block.
#[derive(Clone, PartialEq, Eq)]
pub struct SynStream {
    stream_id: StreamId,
    associated_stream_id: StreamId,
    priority: u8,
    slot: u8,
    headers: HeaderMap,
    flags: SynStreamFlags,
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct SynStreamFlags(u8);

impl SynStream {
    pub fn new(stream_id: StreamId, headers: HeaderMap) -> SynStream {
        SynStream {
            stream_id,
            associated_stream_id: StreamId::ZERO,
            priority: 0,
            slot: 0,
            headers,
            flags: SynStreamFlags::default(),
        }
    }

    pub fn set_associated_stream_id(mut self, id: StreamId) -> Self {
        self.associated_stream_id = id;
        self
    }

    /// Priorities are zero-urgent; values above the version's range are
    /// clamped at encode time (v2 carries 2 bits, v3 carries 3).
    pub fn set_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }

    pub fn set_slot(mut self, slot: u8) -> Self {
        self.slot = slot;
        self
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// The stream this one is associated with; zero means none.
    pub fn associated_stream_id(&self) -> StreamId {
        self.associated_stream_id
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn slot(&self) -> u8 {
        self.slot
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    pub fn is_fin(&self) -> bool {
        self.flags.is_fin()
    }

    pub fn set_fin(mut self) -> Self {
        self.flags.set_fin();
        self
    }

    pub fn is_unidirectional(&self) -> bool {
        self.flags.is_unidirectional()
    }

    pub fn set_unidirectional(mut self) -> Self {
        self.flags.set_unidirectional();
        self
    }

    /// Builds a `SynStream` frame from a raw control frame payload.
    pub(crate) fn load(
        head: ControlHead,
        payload: &[u8],
        version: Version,
        decompressor: &Decompressor,
    ) -> Result<SynStream, FrameError> {
        debug_assert_eq!(head.kind(), Kind::SynStream);

        let flags = SynStreamFlags::load(head.flag())?;

        if payload.len() < PREFIX {
            return Err(FrameError::Malformed);
        }

        let stream_id = StreamId::parse(&payload[..4]);
        if stream_id.is_zero() {
            return Err(FrameError::InvalidStreamId);
        }
        let associated_stream_id = StreamId::parse(&payload[4..8]);

        // v2 packs the priority into 2 bits, v3 into 3; the rest of the
        // two bytes is unused except for the v3 credential slot.
        let (priority, slot) = match version {
            Version::V2 => (payload[8] >> 6, 0),
            Version::V3 => (payload[8] >> 5, payload[9]),
        };

        let headers = decompressor.decompress(&payload[PREFIX..])?;

        Ok(SynStream {
            stream_id,
            associated_stream_id,
            priority,
            slot,
            headers,
            flags,
        })
    }

    pub(crate) fn encode(
        &self,
        version: Version,
        compressor: &Compressor,
        dst: &mut BytesMut,
    ) -> Result<(), BlockError> {
        let block = compressor.compress(&self.headers)?;
        if PREFIX + block.len() > crate::consts::MAX_FRAME_SIZE {
            return Err(BlockError::Overflow);
        }
        log::trace!(
            "encoding SYN_STREAM; id={:?} block={} bytes",
            self.stream_id,
            block.len()
        );

        let head = ControlHead::new(version, Kind::SynStream, self.flags.into());
        head.encode(PREFIX + block.len(), dst);
        dst.put_u32(self.stream_id.into());
        dst.put_u32(self.associated_stream_id.into());
        match version {
            Version::V2 => {
                dst.put_u8(self.priority.min(version.max_priority()) << 6);
                dst.put_u8(0);
            }
            Version::V3 => {
                dst.put_u8(self.priority.min(version.max_priority()) << 5);
                dst.put_u8(self.slot);
            }
        }
        dst.extend_from_slice(&block);
        Ok(())
    }
}

impl From<SynStream> for Frame {
    fn from(src: SynStream) -> Frame {
        Frame::SynStream(src)
    }
}

impl fmt::Debug for SynStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("SynStream");
        builder
            .field("stream_id", &self.stream_id)
            .field("priority", &self.priority)
            .field("flags", &self.flags);
        if !self.associated_stream_id.is_zero() {
            builder.field("associated_stream_id", &self.associated_stream_id);
        }
        if self.slot != 0 {
            builder.field("slot", &self.slot);
        }
        builder.field("headers", &self.headers);
        builder.finish()
    }
}

// ===== impl SynStreamFlags =====

impl SynStreamFlags {
    pub fn load(bits: u8) -> Result<SynStreamFlags, FrameError> {
        if bits & !ALL != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(SynStreamFlags(bits))
    }

    pub fn is_fin(&self) -> bool {
        self.0 & FIN == FIN
    }

    pub fn set_fin(&mut self) {
        self.0 |= FIN;
    }

    pub fn is_unidirectional(&self) -> bool {
        self.0 & UNIDIRECTIONAL == UNIDIRECTIONAL
    }

    pub fn set_unidirectional(&mut self) {
        self.0 |= UNIDIRECTIONAL;
    }
}

impl From<SynStreamFlags> for u8 {
    fn from(src: SynStreamFlags) -> u8 {
        src.0
    }
}

impl fmt::Debug for SynStreamFlags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_flags(fmt, self.0)
            .flag_if(self.is_fin(), "FIN")
            .flag_if(self.is_unidirectional(), "UNIDIRECTIONAL")
            .finish()
    }
}
