use std::fmt;

use ntex_bytes::{BufMut, Bytes, BytesMut};

use crate::frame::{ControlHead, Frame, FrameError, Kind, Version};

/// CREDENTIAL frame (v3 only), installing a client certificate into a
/// slot of the server's credential vector.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    slot: u16,
    proof: Bytes,
    certificates: Vec<Bytes>,
}

impl Credential {
    pub fn new(slot: u16, proof: Bytes) -> Credential {
        Credential {
            slot,
            proof,
            certificates: Vec::new(),
        }
    }

    pub fn push_certificate(&mut self, certificate: Bytes) {
        self.certificates.push(certificate);
    }

    pub fn slot(&self) -> u16 {
        self.slot
    }

    pub fn proof(&self) -> &Bytes {
        &self.proof
    }

    pub fn certificates(&self) -> &[Bytes] {
        &self.certificates
    }

    /// Builds a `Credential` frame from a raw control frame payload.
    pub(crate) fn load(head: ControlHead, payload: &[u8]) -> Result<Credential, FrameError> {
        debug_assert_eq!(head.kind(), Kind::Credential);

        // CREDENTIAL defines no flags.
        if head.flag() != 0 {
            return Err(FrameError::InvalidFlags(head.flag()));
        }

        if payload.len() < 6 {
            return Err(FrameError::Malformed);
        }
        let slot = ((payload[0] as u16) << 8) | payload[1] as u16;

        let mut src = &payload[2..];
        let proof = read_chunk(&mut src)?;

        let mut certificates = Vec::new();
        while !src.is_empty() {
            certificates.push(read_chunk(&mut src)?);
        }

        Ok(Credential {
            slot,
            proof,
            certificates,
        })
    }

    pub(crate) fn encode(&self, version: Version, dst: &mut BytesMut) {
        log::trace!(
            "encoding CREDENTIAL; slot={} certificates={}",
            self.slot,
            self.certificates.len()
        );

        let len = 2
            + 4
            + self.proof.len()
            + self
                .certificates
                .iter()
                .map(|c| 4 + c.len())
                .sum::<usize>();

        let head = ControlHead::new(version, Kind::Credential, 0);
        head.encode(len, dst);
        dst.put_u16(self.slot);
        dst.put_u32(self.proof.len() as u32);
        dst.extend_from_slice(&self.proof);
        for certificate in &self.certificates {
            dst.put_u32(certificate.len() as u32);
            dst.extend_from_slice(certificate);
        }
    }
}

fn read_chunk(src: &mut &[u8]) -> Result<Bytes, FrameError> {
    if src.len() < 4 {
        return Err(FrameError::Malformed);
    }
    let len = unpack_octets_4!(src, 0, usize);
    if src.len() - 4 < len {
        return Err(FrameError::Malformed);
    }
    let chunk = Bytes::copy_from_slice(&src[4..4 + len]);
    *src = &src[4 + len..];
    Ok(chunk)
}

impl From<Credential> for Frame {
    fn from(src: Credential) -> Frame {
        Frame::Credential(src)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("slot", &self.slot)
            .field("proof_len", &self.proof.len())
            .field("certificates", &self.certificates.len())
            .finish()
    }
}
