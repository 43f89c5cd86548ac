use std::fmt;

use ntex_bytes::{BufMut, BytesMut};

use crate::frame::{util, ControlHead, Frame, FrameError, Kind, Version};

const CLEAR_SETTINGS: u8 = 0x1;
const ALL: u8 = CLEAR_SETTINGS;

const PERSIST_VALUE: u8 = 0x1;
const PERSISTED: u8 = 0x2;
const ENTRY_ALL: u8 = PERSIST_VALUE | PERSISTED;

/// SETTINGS frame: a list of id/value pairs.
///
/// The entry encoding is the best-known SPDY quirk: v2 writes the
/// 24-bit id little-endian followed by the entry flags, v3 writes the
/// entry flags followed by the id big-endian. Both are reproduced
/// exactly.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Settings {
    flags: SettingsFlags,
    entries: Vec<Setting>,
}

/// A single SETTINGS entry.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Setting {
    flags: SettingFlags,
    id: SettingId,
    value: u32,
}

/// SETTINGS ids. Ids are 24 bits on the wire.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SettingId(u32);

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct SettingsFlags(u8);

#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct SettingFlags(u8);

// ===== impl Settings =====

impl Settings {
    pub fn new() -> Settings {
        Settings::default()
    }

    pub fn push(&mut self, setting: Setting) {
        self.entries.push(setting);
    }

    pub fn entries(&self) -> &[Setting] {
        &self.entries
    }

    pub fn is_clear_settings(&self) -> bool {
        self.flags.is_clear_settings()
    }

    pub fn set_clear_settings(mut self) -> Self {
        self.flags.set_clear_settings();
        self
    }

    /// Builds a `Settings` frame from a raw control frame payload.
    pub(crate) fn load(
        head: ControlHead,
        payload: &[u8],
        version: Version,
    ) -> Result<Settings, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Settings);

        let flags = SettingsFlags::load(head.flag())?;

        if payload.len() < 4 {
            return Err(FrameError::Malformed);
        }
        let count = unpack_octets_4!(payload, 0, usize);

        let expected = count
            .checked_mul(8)
            .and_then(|n| n.checked_add(4))
            .ok_or(FrameError::Malformed)?;
        if payload.len() != expected {
            return Err(FrameError::IncorrectDataLength {
                read: payload.len(),
                expected,
            });
        }

        let mut entries = Vec::with_capacity(count);
        for chunk in payload[4..].chunks_exact(8) {
            let (flag_bits, id) = match version {
                Version::V2 => (
                    chunk[3],
                    (chunk[0] as u32) | ((chunk[1] as u32) << 8) | ((chunk[2] as u32) << 16),
                ),
                Version::V3 => (
                    chunk[0],
                    ((chunk[1] as u32) << 16) | ((chunk[2] as u32) << 8) | chunk[3] as u32,
                ),
            };
            entries.push(Setting {
                flags: SettingFlags::load(flag_bits)?,
                id: SettingId(id),
                value: unpack_octets_4!(chunk, 4, u32),
            });
        }

        Ok(Settings { flags, entries })
    }

    pub(crate) fn encode(&self, version: Version, dst: &mut BytesMut) {
        log::trace!("encoding SETTINGS; len={}", self.entries.len());

        let head = ControlHead::new(version, Kind::Settings, self.flags.into());
        head.encode(4 + 8 * self.entries.len(), dst);
        dst.put_u32(self.entries.len() as u32);

        for entry in &self.entries {
            let id = u32::from(entry.id) & 0x00ff_ffff;
            match version {
                Version::V2 => {
                    dst.put_u8(id as u8);
                    dst.put_u8((id >> 8) as u8);
                    dst.put_u8((id >> 16) as u8);
                    dst.put_u8(entry.flags.into());
                }
                Version::V3 => {
                    dst.put_u8(entry.flags.into());
                    dst.put_u8((id >> 16) as u8);
                    dst.put_u8((id >> 8) as u8);
                    dst.put_u8(id as u8);
                }
            }
            dst.put_u32(entry.value);
        }
    }
}

impl From<Settings> for Frame {
    fn from(src: Settings) -> Frame {
        Frame::Settings(src)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("flags", &self.flags)
            .field("entries", &self.entries)
            .finish()
    }
}

// ===== impl Setting =====

impl Setting {
    pub fn new(id: SettingId, value: u32) -> Setting {
        Setting {
            flags: SettingFlags::default(),
            id,
            value,
        }
    }

    pub fn id(&self) -> SettingId {
        self.id
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn is_persist_value(&self) -> bool {
        self.flags.is_persist_value()
    }

    pub fn set_persist_value(mut self) -> Self {
        self.flags.0 |= PERSIST_VALUE;
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.flags.is_persisted()
    }

    pub fn set_persisted(mut self) -> Self {
        self.flags.0 |= PERSISTED;
        self
    }
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}={} {:?}", self.id, self.value, self.flags)
    }
}

// ===== impl SettingId =====

impl SettingId {
    pub const UPLOAD_BANDWIDTH: SettingId = SettingId(1);
    pub const DOWNLOAD_BANDWIDTH: SettingId = SettingId(2);
    pub const ROUND_TRIP_TIME: SettingId = SettingId(3);
    pub const MAX_CONCURRENT_STREAMS: SettingId = SettingId(4);
    pub const CURRENT_CWND: SettingId = SettingId(5);
    pub const DOWNLOAD_RETRANS_RATE: SettingId = SettingId(6);
    pub const INITIAL_WINDOW_SIZE: SettingId = SettingId(7);
    pub const CLIENT_CERTIFICATE_VECTOR_SIZE: SettingId = SettingId(8);
}

impl From<u32> for SettingId {
    fn from(src: u32) -> SettingId {
        SettingId(src & 0x00ff_ffff)
    }
}

impl From<SettingId> for u32 {
    fn from(src: SettingId) -> u32 {
        src.0
    }
}

impl fmt::Debug for SettingId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            1 => "UPLOAD_BANDWIDTH",
            2 => "DOWNLOAD_BANDWIDTH",
            3 => "ROUND_TRIP_TIME",
            4 => "MAX_CONCURRENT_STREAMS",
            5 => "CURRENT_CWND",
            6 => "DOWNLOAD_RETRANS_RATE",
            7 => "INITIAL_WINDOW_SIZE",
            8 => "CLIENT_CERTIFICATE_VECTOR_SIZE",
            other => return write!(fmt, "SettingId({})", other),
        };
        fmt.write_str(name)
    }
}

// ===== impl SettingsFlags =====

impl SettingsFlags {
    pub fn load(bits: u8) -> Result<SettingsFlags, FrameError> {
        if bits & !ALL != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(SettingsFlags(bits))
    }

    pub fn is_clear_settings(&self) -> bool {
        self.0 & CLEAR_SETTINGS == CLEAR_SETTINGS
    }

    pub fn set_clear_settings(&mut self) {
        self.0 |= CLEAR_SETTINGS;
    }
}

impl From<SettingsFlags> for u8 {
    fn from(src: SettingsFlags) -> u8 {
        src.0
    }
}

impl fmt::Debug for SettingsFlags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_flags(fmt, self.0)
            .flag_if(self.is_clear_settings(), "CLEAR_SETTINGS")
            .finish()
    }
}

// ===== impl SettingFlags =====

impl SettingFlags {
    pub fn load(bits: u8) -> Result<SettingFlags, FrameError> {
        if bits & !ENTRY_ALL != 0 {
            return Err(FrameError::InvalidFlags(bits));
        }
        Ok(SettingFlags(bits))
    }

    pub fn is_persist_value(&self) -> bool {
        self.0 & PERSIST_VALUE == PERSIST_VALUE
    }

    pub fn is_persisted(&self) -> bool {
        self.0 & PERSISTED == PERSISTED
    }
}

impl From<SettingFlags> for u8 {
    fn from(src: SettingFlags) -> u8 {
        src.0
    }
}

impl fmt::Debug for SettingFlags {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        util::debug_flags(fmt, self.0)
            .flag_if(self.is_persist_value(), "PERSIST_VALUE")
            .flag_if(self.is_persisted(), "PERSISTED")
            .finish()
    }
}
