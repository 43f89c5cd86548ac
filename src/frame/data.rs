use std::fmt;

use ntex_bytes::{Bytes, BytesMut};

use crate::frame::{util, DataHead, Frame, FrameError, StreamId};

const FIN: u8 = 0x1;
const ALL: u8 = FIN;

/// Data frame: an opaque, variable-length run of octets on a stream.
#[derive(Clone, Eq, PartialEq)]
pub struct Data {
    stream_id: StreamId,
    data: Bytes,
    flags: DataFlags,
}

#[derive(Default, Copy, Clone, Eq, PartialEq)]
struct DataFlags(u8);

impl Data {
    /// Creates a new data frame.
    pub fn new(stream_id: StreamId, payload: Bytes) -> Self {
        Data {
            stream_id,
            data: payload,
            flags: DataFlags::default(),
        }
    }

    /// The stream this frame belongs to; never zero.
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Whether this is the last frame the endpoint sends on the stream.
    pub fn is_fin(&self) -> bool {
        self.flags.is_fin()
    }

    pub fn set_fin(&mut self) {
        self.flags.set_fin();
    }

    pub fn payload(&self) -> &Bytes {
        &self.data
    }

    pub fn into_payload(self) -> Bytes {
        self.data
    }

    pub(crate) fn load(head: DataHead, data: Bytes) -> Result<Self, FrameError> {
        let flags = DataFlags::load(head.flag())?;

        if head.stream_id().is_zero() {
            return Err(FrameError::InvalidStreamId);
        }

        Ok(Data {
            data,
            flags,
            stream_id: head.stream_id(),
        })
    }

    pub(crate) fn encode(&self, dst: &mut BytesMut) {
        let head = DataHead::new(self.stream_id, self.flags.into());
        head.encode(self.data.len(), dst);
        dst.extend_from_slice(&self.data);
    }
}

impl From<Data> for Frame {
    fn from(src: Data) -> Self {
        Frame::Data(src)
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = fmt.debug_struct("Data");
        f.field("stream_id", &self.stream_id);
        f.field("data_len", &self.data.len());
        if !self.flags.is_empty() {
            f.field("flags", &self.flags);
        }
        // payload bytes purposefully excluded
        f.finish()
    }
}

// ===== impl DataFlags =====

impl DataFlags {
    fn load(bits: u8) -> Result<DataFlags, FrameError> {
        if bits & !ALL != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(DataFlags(bits))
    }

    fn is_empty(&self) -> bool {
        self.0 == 0
    }

    fn is_fin(&self) -> bool {
        self.0 & FIN == FIN
    }

    fn set_fin(&mut self) {
        self.0 |= FIN
    }
}

impl From<DataFlags> for u8 {
    fn from(src: DataFlags) -> u8 {
        src.0
    }
}

impl fmt::Debug for DataFlags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_flags(fmt, self.0)
            .flag_if(self.is_fin(), "FIN")
            .finish()
    }
}
