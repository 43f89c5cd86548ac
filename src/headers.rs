//! The SPDY name/value header block.
//!
//! A header block maps lowercase ASCII names to one or more values,
//! preserving insertion order for names and arrival order for values.
//! On the wire the block is a length-prefixed pair list (2-byte fields
//! on v2, 4-byte fields on v3) in which multiple values for one name
//! are joined with a single NUL byte; the serialized form is what the
//! connection's zlib stream compresses.

use std::{fmt, str};

use ntex_bytes::{BufMut, ByteString, BytesMut};

use crate::consts::MAX_HEADER_BLOCK_SIZE;
use crate::frame::Version;
use crate::zlib::BlockError;

/// An ordered multimap of header names to values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(ByteString, Vec<ByteString>)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a value, keeping any values already present under `name`.
    ///
    /// Names are normalized to lowercase; SPDY requires lowercase names
    /// on the wire.
    pub fn append<N, V>(&mut self, name: N, value: V)
    where
        N: Into<ByteString>,
        V: Into<ByteString>,
    {
        let name = normalize(name.into());
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n[..] == name[..]) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// Set `name` to exactly one value, dropping any previous values.
    pub fn insert<N, V>(&mut self, name: N, value: V)
    where
        N: Into<ByteString>,
        V: Into<ByteString>,
    {
        let name = normalize(name.into());
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| n[..] == name[..]) {
            Some((_, values)) => {
                values.clear();
                values.push(value);
            }
            None => self.entries.push((name, vec![value])),
        }
    }

    /// First value under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ByteString> {
        self.get_all(name).first()
    }

    /// All values under `name`, in arrival order.
    pub fn get_all(&self, name: &str) -> &[ByteString] {
        self.entries
            .iter()
            .find(|(n, _)| n[..] == *name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n[..] == *name)
    }

    /// Remove every value under `name`.
    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(n, _)| n[..] != *name);
    }

    /// Iterate over `(name, value)` pairs, one pair per value.
    pub fn iter(&self) -> impl Iterator<Item = (&ByteString, &ByteString)> {
        self.entries
            .iter()
            .flat_map(|(name, values)| values.iter().map(move |v| (name, v)))
    }

    /// Iterate over the distinct names.
    pub fn names(&self) -> impl Iterator<Item = &ByteString> {
        self.entries.iter().map(|(name, _)| name)
    }

    /// Serialize to the uncompressed wire form.
    pub(crate) fn encode(&self, version: Version, dst: &mut BytesMut) {
        put_len(dst, version, self.entries.len());

        for (name, values) in &self.entries {
            put_len(dst, version, name.len());
            dst.extend_from_slice(name.as_bytes());

            // Values under one name are NUL-joined into one field.
            let joined = values.iter().map(|v| v.len()).sum::<usize>() + values.len() - 1;
            put_len(dst, version, joined);
            for (i, value) in values.iter().enumerate() {
                if i > 0 {
                    dst.put_u8(0);
                }
                dst.extend_from_slice(value.as_bytes());
            }
        }
    }

    /// Parse the uncompressed wire form.
    ///
    /// Every declared length is charged against a running allowance that
    /// starts at `MAX_HEADER_BLOCK_SIZE`, so a hostile block cannot make
    /// us allocate more than one frame's worth of header data no matter
    /// what lengths it declares.
    pub(crate) fn parse(mut src: &[u8], version: Version) -> Result<HeaderMap, BlockError> {
        let count = read_len(&mut src, version)?;

        let mut headers = HeaderMap::new();
        let mut bounds = MAX_HEADER_BLOCK_SIZE;

        for _ in 0..count {
            let name_len = read_len(&mut src, version)?;
            if name_len > bounds {
                return Err(BlockError::Overflow);
            }
            bounds -= name_len;
            let name = read_field(&mut src, name_len)?;
            validate_name(name, version)?;
            let name = ByteString::from(
                str::from_utf8(name).map_err(|_| BlockError::InvalidName)?,
            );

            let value_len = read_len(&mut src, version)?;
            if value_len > bounds {
                return Err(BlockError::Overflow);
            }
            bounds -= value_len;
            let value = read_field(&mut src, value_len)?;

            // NUL boundaries separate the individual values.
            let mut values = Vec::new();
            for part in value.split(|b| *b == 0) {
                let part = str::from_utf8(part).map_err(|_| BlockError::Malformed)?;
                values.push(ByteString::from(part));
            }
            headers.entries.push((name, values));
        }

        Ok(headers)
    }
}

impl fmt::Debug for HeaderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for HeaderMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

fn normalize(name: ByteString) -> ByteString {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        ByteString::from(name.to_lowercase())
    } else {
        name
    }
}

fn put_len(dst: &mut BytesMut, version: Version, len: usize) {
    match version {
        Version::V2 => dst.put_u16(len as u16),
        Version::V3 => dst.put_u32(len as u32),
    }
}

fn read_len(src: &mut &[u8], version: Version) -> Result<usize, BlockError> {
    let width = version.block_len_width();
    if src.len() < width {
        return Err(BlockError::Malformed);
    }
    let len = match version {
        Version::V2 => ((src[0] as usize) << 8) | src[1] as usize,
        Version::V3 => {
            ((src[0] as usize) << 24)
                | ((src[1] as usize) << 16)
                | ((src[2] as usize) << 8)
                | src[3] as usize
        }
    };
    *src = &src[width..];
    Ok(len)
}

fn read_field<'a>(src: &mut &'a [u8], len: usize) -> Result<&'a [u8], BlockError> {
    if src.len() < len {
        return Err(BlockError::Malformed);
    }
    let (field, rest) = src.split_at(len);
    *src = rest;
    Ok(field)
}

fn validate_name(name: &[u8], version: Version) -> Result<(), BlockError> {
    // SPDY/3 forbids empty and uppercase names on the wire.
    if version == Version::V3
        && (name.is_empty() || name.iter().any(|b| b.is_ascii_uppercase()))
    {
        return Err(BlockError::InvalidName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut headers = HeaderMap::new();
        headers.append("cookie", "a=1");
        headers.append("cookie", "b=2");
        headers.append("host", "example.com");

        assert_eq!(headers.len(), 2);
        assert_eq!(&headers.get("cookie").unwrap()[..], "a=1");
        let values: Vec<&str> = headers.get_all("cookie").iter().map(|v| &v[..]).collect();
        assert_eq!(values, ["a=1", "b=2"]);
        let names: Vec<&str> = headers.names().map(|n| &n[..]).collect();
        assert_eq!(names, ["cookie", "host"]);
    }

    #[test]
    fn test_names_lowercased() {
        let mut headers = HeaderMap::new();
        headers.append("Content-Length", "42");
        assert_eq!(&headers.get("content-length").unwrap()[..], "42");
        assert!(!headers.contains_key("Content-Length"));
    }

    #[test]
    fn test_wire_roundtrip_v3() {
        let mut headers = HeaderMap::new();
        headers.append(":status", "200");
        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");

        let mut buf = BytesMut::new();
        headers.encode(Version::V3, &mut buf);

        // pair count, then per-pair length-prefixed fields
        assert_eq!(&buf[..4], [0, 0, 0, 2]);

        let parsed = HeaderMap::parse(&buf, Version::V3).unwrap();
        assert_eq!(parsed, headers);
    }

    #[test]
    fn test_wire_roundtrip_v2_widths() {
        let mut headers = HeaderMap::new();
        headers.append("host", "example.com");

        let mut buf = BytesMut::new();
        headers.encode(Version::V2, &mut buf);

        assert_eq!(&buf[..2], [0, 1]);
        assert_eq!(&buf[2..4], [0, 4]);
        assert_eq!(&buf[4..8], b"host");

        let parsed = HeaderMap::parse(&buf, Version::V2).unwrap();
        assert_eq!(parsed, headers);
    }

    #[test]
    fn test_rejects_uppercase_name_v3() {
        let mut buf = BytesMut::new();
        buf.put_u32(1);
        buf.put_u32(4);
        buf.extend_from_slice(b"Host");
        buf.put_u32(1);
        buf.extend_from_slice(b"x");

        assert_eq!(
            HeaderMap::parse(&buf, Version::V3),
            Err(BlockError::InvalidName)
        );
    }

    #[test]
    fn test_declared_length_over_allowance() {
        let mut buf = BytesMut::new();
        buf.put_u32(1);
        buf.put_u32(MAX_HEADER_BLOCK_SIZE as u32 + 1);

        assert_eq!(
            HeaderMap::parse(&buf, Version::V3),
            Err(BlockError::Overflow)
        );
    }

    #[test]
    fn test_truncated_block() {
        let mut buf = BytesMut::new();
        buf.put_u32(1);
        buf.put_u32(10);
        buf.extend_from_slice(b"short");

        assert_eq!(
            HeaderMap::parse(&buf, Version::V3),
            Err(BlockError::Malformed)
        );
    }
}
