use std::fmt;

use ntex_bytes::{BufMut, BytesMut};

use crate::frame::{util, ControlHead, Frame, FrameError, Kind, StreamId, Version};
use crate::headers::HeaderMap;
use crate::zlib::{BlockError, Compressor, Decompressor};

const FIN: u8 = 0x1;
const ALL: u8 = FIN;

/// HEADERS frame, adding headers to an existing stream.
///
/// Same wire shape as SYN_REPLY, including the two reserved v2 bytes
/// before the block.
#[derive(Clone, PartialEq, Eq)]
pub struct Headers {
    stream_id: StreamId,
    headers: HeaderMap,
    flags: HeadersFlags,
}

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct HeadersFlags(u8);

impl Headers {
    pub fn new(stream_id: StreamId, headers: HeaderMap) -> Headers {
        Headers {
            stream_id,
            headers,
            flags: HeadersFlags::default(),
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
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

    /// Builds a `Headers` frame from a raw control frame payload.
    pub(crate) fn load(
        head: ControlHead,
        payload: &[u8],
        version: Version,
        decompressor: &Decompressor,
    ) -> Result<Headers, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Headers);

        let flags = HeadersFlags::load(head.flag())?;

        let prefix = 4 + version.block_padding();
        if payload.len() < prefix {
            return Err(FrameError::Malformed);
        }

        let stream_id = StreamId::parse(&payload[..4]);
        if stream_id.is_zero() {
            return Err(FrameError::InvalidStreamId);
        }

        let headers = decompressor.decompress(&payload[prefix..])?;

        Ok(Headers {
            stream_id,
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
        let pad = version.block_padding();
        if 4 + pad + block.len() > crate::consts::MAX_FRAME_SIZE {
            return Err(BlockError::Overflow);
        }
        log::trace!(
            "encoding HEADERS; id={:?} block={} bytes",
            self.stream_id,
            block.len()
        );
        let head = ControlHead::new(version, Kind::Headers, self.flags.into());
        head.encode(4 + pad + block.len(), dst);
        dst.put_u32(self.stream_id.into());
        for _ in 0..pad {
            dst.put_u8(0);
        }
        dst.extend_from_slice(&block);
        Ok(())
    }
}

impl From<Headers> for Frame {
    fn from(src: Headers) -> Frame {
        Frame::Headers(src)
    }
}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Headers")
            .field("stream_id", &self.stream_id)
            .field("flags", &self.flags)
            .field("headers", &self.headers)
            .finish()
    }
}

// ===== impl HeadersFlags =====

impl HeadersFlags {
    pub fn load(bits: u8) -> Result<HeadersFlags, FrameError> {
        if bits & !ALL != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(HeadersFlags(bits))
    }

    pub fn is_fin(&self) -> bool {
        self.0 & FIN == FIN
    }

    pub fn set_fin(&mut self) {
        self.0 |= FIN;
    }
}

impl From<HeadersFlags> for u8 {
    fn from(src: HeadersFlags) -> u8 {
        src.0
    }
}

impl fmt::Debug for HeadersFlags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_flags(fmt, self.0)
            .flag_if(self.is_fin(), "FIN")
            .finish()
    }
}
