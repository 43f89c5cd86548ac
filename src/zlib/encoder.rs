use std::{fmt, sync::Mutex};

use flate2::{Compress, Compression, FlushCompress};
use ntex_bytes::{Bytes, BytesMut};

use super::BlockError;
use crate::frame::Version;
use crate::headers::HeaderMap;

/// Stateful header-block compressor for one direction of a connection.
///
/// The underlying deflate stream is created on first use, at best
/// compression, primed with the version's dictionary, and then lives as
/// long as the connection. Calls are serialized by an internal lock;
/// the order callers acquire it is the order their output must appear
/// on the wire.
pub struct Compressor {
    version: Version,
    stream: Mutex<Option<Compress>>,
}

impl Compressor {
    pub fn new(version: Version) -> Compressor {
        Compressor {
            version,
            stream: Mutex::new(None),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Compress one header block, returning the bytes produced for this
    /// block alone.
    pub fn compress(&self, headers: &HeaderMap) -> Result<Bytes, BlockError> {
        let mut plain = BytesMut::new();
        headers.encode(self.version, &mut plain);

        // A poisoned lock means a previous block died mid-stream; the
        // deflate state is unusable either way.
        let mut guard = self.stream.lock().map_err(|_| BlockError::Compression)?;
        if guard.is_none() {
            let mut c = Compress::new(Compression::best(), true);
            c.set_dictionary(self.version.dictionary()).map_err(|e| {
                log::debug!("zlib dictionary rejected: {}", e);
                BlockError::Compression
            })?;
            *guard = Some(c);
        }
        let stream = guard.as_mut().unwrap();

        let mut out = Vec::with_capacity(plain.len() / 2 + 32);

        let mut input = &plain[..];
        while !input.is_empty() {
            let consumed_before = stream.total_in();
            stream
                .compress_vec(input, &mut out, FlushCompress::None)
                .map_err(|e| {
                    log::debug!("header block deflate failed: {}", e);
                    BlockError::Compression
                })?;
            input = &input[(stream.total_in() - consumed_before) as usize..];
            if !input.is_empty() {
                out.reserve(out.capacity().max(64));
            }
        }

        // SYNC flush, so the peer can decode the whole block without
        // waiting for the next frame's input.
        loop {
            if out.len() == out.capacity() {
                out.reserve(64);
            }
            stream
                .compress_vec(&[], &mut out, FlushCompress::Sync)
                .map_err(|e| {
                    log::debug!("header block flush failed: {}", e);
                    BlockError::Compression
                })?;
            if out.len() < out.capacity() {
                break;
            }
        }

        log::trace!(
            "compressed header block, {} -> {} bytes",
            plain.len(),
            out.len()
        );
        Ok(Bytes::from(out))
    }
}

impl fmt::Debug for Compressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compressor")
            .field("version", &self.version)
            .finish()
    }
}
