use ntex_bytes::BufMut;

use super::{StreamId, Version, HEADER_LEN};

/// Common 8-byte frame header, already split by the control bit.
///
/// The first bit of a frame decides its shape: control frames carry a
/// version and a type, data frames carry a stream id. Length and flags
/// sit at the same offsets in both.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Head {
    Control(ControlHead),
    Data(DataHead),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ControlHead {
    version: u16,
    kind: u16,
    flag: u8,
    length: u32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DataHead {
    stream_id: StreamId,
    flag: u8,
    length: u32,
}

/// Control frame types.
#[repr(u16)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Kind {
    SynStream = 1,
    SynReply = 2,
    Reset = 3,
    Settings = 4,
    Noop = 5,
    Ping = 6,
    GoAway = 7,
    Headers = 8,
    WindowUpdate = 9,
    Credential = 10,
    Unknown,
}

// ===== impl Head =====

impl Head {
    /// Parse a SPDY frame header. `header` must hold at least 8 bytes.
    pub fn parse(header: &[u8]) -> Head {
        debug_assert!(header.len() >= HEADER_LEN);

        let length = ((header[5] as u32) << 16) | ((header[6] as u32) << 8) | header[7] as u32;

        if header[0] & 0x80 != 0 {
            Head::Control(ControlHead {
                version: (((header[0] & 0x7f) as u16) << 8) | header[1] as u16,
                kind: ((header[2] as u16) << 8) | header[3] as u16,
                flag: header[4],
                length,
            })
        } else {
            Head::Data(DataHead {
                stream_id: StreamId::parse(&header[..4]),
                flag: header[4],
                length,
            })
        }
    }
}

// ===== impl ControlHead =====

impl ControlHead {
    pub fn new(version: Version, kind: Kind, flag: u8) -> ControlHead {
        ControlHead {
            version: version.number(),
            kind: kind as u16,
            flag,
            length: 0,
        }
    }

    /// Version number as it appeared on the wire.
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn kind(&self) -> Kind {
        Kind::new(self.kind)
    }

    /// Raw type code, kept for error reporting on unknown kinds.
    pub fn kind_code(&self) -> u16 {
        self.kind
    }

    pub fn flag(&self) -> u8 {
        self.flag
    }

    /// Declared payload length.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn encode<T: BufMut>(&self, payload_len: usize, dst: &mut T) {
        dst.put_u16(0x8000 | self.version);
        dst.put_u16(self.kind);
        dst.put_u8(self.flag);
        dst.put_uint(payload_len as u64, 3);
    }
}

// ===== impl DataHead =====

impl DataHead {
    pub fn new(stream_id: StreamId, flag: u8) -> DataHead {
        DataHead {
            stream_id,
            flag,
            length: 0,
        }
    }

    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    pub fn flag(&self) -> u8 {
        self.flag
    }

    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn encode<T: BufMut>(&self, payload_len: usize, dst: &mut T) {
        dst.put_u32(self.stream_id.into());
        dst.put_u8(self.flag);
        dst.put_uint(payload_len as u64, 3);
    }
}

// ===== impl Kind =====

impl Kind {
    pub fn new(code: u16) -> Kind {
        match code {
            1 => Kind::SynStream,
            2 => Kind::SynReply,
            3 => Kind::Reset,
            4 => Kind::Settings,
            5 => Kind::Noop,
            6 => Kind::Ping,
            7 => Kind::GoAway,
            8 => Kind::Headers,
            9 => Kind::WindowUpdate,
            10 => Kind::Credential,
            _ => Kind::Unknown,
        }
    }

    /// Whether the frame type exists in the given protocol version.
    pub(crate) fn is_defined(self, version: Version) -> bool {
        match self {
            Kind::Noop => version == Version::V2,
            Kind::WindowUpdate | Kind::Credential => version == Version::V3,
            Kind::Unknown => false,
            _ => true,
        }
    }
}
