use std::{cmp, fmt, sync::Mutex};

use flate2::{Decompress, FlushDecompress};

use super::BlockError;
use crate::consts::MAX_HEADER_BLOCK_SIZE;
use crate::frame::Version;
use crate::headers::HeaderMap;

/// Stateful header-block decompressor for one direction of a connection.
///
/// Mirror image of [`Compressor`](super::Compressor): one long-lived
/// inflate stream whose state spans every header-bearing frame received
/// on the connection. The preset dictionary is installed when the
/// stream first asks for it, which the zlib header of the peer's first
/// block triggers.
pub struct Decompressor {
    version: Version,
    stream: Mutex<Option<Decompress>>,
}

impl Decompressor {
    pub fn new(version: Version) -> Decompressor {
        Decompressor {
            version,
            stream: Mutex::new(None),
        }
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Inflate and parse one compressed header block.
    pub fn decompress(&self, src: &[u8]) -> Result<HeaderMap, BlockError> {
        let mut guard = self.stream.lock().map_err(|_| BlockError::Compression)?;
        let stream = guard.get_or_insert_with(|| Decompress::new(true));

        let mut plain =
            Vec::with_capacity(cmp::min(MAX_HEADER_BLOCK_SIZE, src.len() * 4 + 64));

        let mut pos = 0;
        while pos < src.len() {
            if plain.len() == plain.capacity() {
                grow(&mut plain)?;
            }

            let consumed_before = stream.total_in();
            let produced_before = stream.total_out();
            let mut installed_dict = false;
            match stream.decompress_vec(&src[pos..], &mut plain, FlushDecompress::Sync) {
                Ok(_) => {}
                Err(e) if e.needs_dictionary().is_some() => {
                    stream
                        .set_dictionary(self.version.dictionary())
                        .map_err(|e| {
                            log::debug!("zlib dictionary rejected: {}", e);
                            BlockError::Compression
                        })?;
                    installed_dict = true;
                }
                Err(e) => {
                    log::debug!("header block inflate failed: {}", e);
                    return Err(BlockError::Compression);
                }
            }
            pos += (stream.total_in() - consumed_before) as usize;

            // No forward progress with room to spare means the stream
            // is wedged rather than short on buffer space.
            if !installed_dict
                && stream.total_in() == consumed_before
                && stream.total_out() == produced_before
                && plain.len() < plain.capacity()
            {
                return Err(BlockError::Compression);
            }
        }

        // Drain output still buffered inside the inflater.
        loop {
            if plain.len() == plain.capacity() {
                grow(&mut plain)?;
            }
            let produced_before = stream.total_out();
            stream
                .decompress_vec(&[], &mut plain, FlushDecompress::Sync)
                .map_err(|e| {
                    log::debug!("header block inflate failed: {}", e);
                    BlockError::Compression
                })?;
            if stream.total_out() == produced_before {
                break;
            }
        }

        log::trace!(
            "decompressed header block, {} -> {} bytes",
            src.len(),
            plain.len()
        );
        HeaderMap::parse(&plain, self.version)
    }
}

impl fmt::Debug for Decompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decompressor")
            .field("version", &self.version)
            .finish()
    }
}

fn grow(plain: &mut Vec<u8>) -> Result<(), BlockError> {
    if plain.len() >= MAX_HEADER_BLOCK_SIZE {
        return Err(BlockError::Overflow);
    }
    let additional = cmp::min(
        cmp::max(plain.capacity(), 512),
        MAX_HEADER_BLOCK_SIZE - plain.len(),
    );
    plain.reserve(additional);
    Ok(())
}
